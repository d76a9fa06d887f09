fn main() -> anyhow::Result<()> {
    dagorarc::cli::run_cli()
}
