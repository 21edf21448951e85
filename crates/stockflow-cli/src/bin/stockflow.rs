fn main() -> anyhow::Result<()> {
    env_logger::init();
    stockflow_cli::run()
}
