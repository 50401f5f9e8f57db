use clap::Subcommand;

use super::open_repository;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List logged sessions, newest first
    List {
        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Attach a note photo to a session
    AttachPhoto {
        /// Session ID
        id: i64,
        /// Path or URI of the photo
        path: String,
    },
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    match action {
        SessionsAction::List { limit } => {
            let mut sessions = repo.get_all_sessions();
            if let Some(limit) = limit {
                sessions.truncate(limit);
            }
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        SessionsAction::AttachPhoto { id, path } => {
            if !repo.attach_note_photo(id, &path)? {
                return Err(format!("no session with id {id}").into());
            }
            println!("ok");
        }
    }
    Ok(())
}
