use crate::error::Fault;
use crate::platform::Platform;

pub const CD: &str = "cd";

/// `cd [path]` runs inside the shell itself; no process is spawned. With no
/// argument the home directory is the target.
pub fn change_dir<P: Platform>(platform: &mut P, args: &[String]) -> Result<(), Fault> {
    let path = match args.get(1) {
        Some(path) => path.clone(),
        None => platform.home_dir().unwrap_or_default(),
    };
    platform
        .change_dir(&path)
        .map_err(|_| Fault::ChangeDirectory(path))
}
