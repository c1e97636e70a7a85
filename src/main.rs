fn main() -> anyhow::Result<()> {
    scm::cli::run()
}
