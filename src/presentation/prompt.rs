// Interactive folder selection
use crate::application::dashboard_publisher::{Folder, FolderPrompt};
use crate::domain::error::DeployError;
use std::io::{self, BufRead, Write};

/// Folder id of Grafana's built-in "General" folder.
const GENERAL_FOLDER_ID: i64 = 0;

/// Reads the answer from the terminal. Blocking; `DashboardService` calls it on a blocking thread.
pub struct StdinFolderPrompt;

impl FolderPrompt for StdinFolderPrompt {
    fn choose_folder(&self, dashboard_title: &str, folders: &[Folder]) -> Result<i64, DeployError> {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        read_folder_choice(&mut stdin.lock(), &mut stderr, dashboard_title, folders)
    }
}

/// Lists `folders` on `output` and reads one folder id from `input`.
pub fn read_folder_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dashboard_title: &str,
    folders: &[Folder],
) -> Result<i64, DeployError> {
    writeln!(output, "No folder given for '{}'. Available folders:", dashboard_title)?;
    writeln!(output, "  {:>6}  General", GENERAL_FOLDER_ID)?;
    for folder in folders {
        writeln!(output, "  {:>6}  {}", folder.id, folder.title)?;
    }
    write!(output, "Folder ID: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    let id: i64 = answer
        .parse()
        .map_err(|_| DeployError::InvalidFolder(format!("'{}' is not a folder id", answer)))?;

    if id == GENERAL_FOLDER_ID || folders.iter().any(|f| f.id == id) {
        Ok(id)
    } else {
        Err(DeployError::InvalidFolder(format!("no folder with id {}", id)))
    }
}
