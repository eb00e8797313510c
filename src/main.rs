use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = fs_util::cli::parse();
    app::run(args)
}
