//! Small helpers shared across the bots.

use std::path::PathBuf;

use rand::seq::SliceRandom;

/// Joins a directory path with a subdirectory or file name.
///
/// # Examples
///
/// ```
/// # use clubbot::utils::get_path;
/// let path = get_path("/var/lib/clubbot", "volunteers");
/// assert_eq!(path, "/var/lib/clubbot/volunteers");
/// ```
pub fn get_path(dir_path: &str, subdir_path: &str) -> String {
    let path_buf: PathBuf = [dir_path, subdir_path].iter().collect();
    path_buf.to_string_lossy().into_owned()
}

/// Picks one of `lines` at random, or an empty string when there is none.
pub fn pick_random(lines: &[&'static str]) -> &'static str {
    lines.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}
