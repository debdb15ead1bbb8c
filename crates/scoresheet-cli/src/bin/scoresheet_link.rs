fn main() -> anyhow::Result<()> {
    scoresheet_cli::run()
}
