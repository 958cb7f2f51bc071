use bte_cli::{build_cli, init_logging, load_settings, run};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let matches = build_cli().get_matches();

    let settings = load_settings(matches.get_one::<PathBuf>("settings").map(PathBuf::as_path))?;
    init_logging(matches.get_count("verbose"), settings.logfile_name.as_deref())?;

    let mut stdout = std::io::stdout().lock();
    let code = run(&matches, &settings, &mut stdout)?;
    Ok(ExitCode::from(code))
}
