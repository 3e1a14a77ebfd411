use anyhow::Result;

fn main() -> Result<()> {
    ytentry::cli::main()
}
