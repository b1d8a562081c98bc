//! Thin git2 wrapper used by the git-backed file system

use crate::{Error, Result};
use git2::{IndexAddOption, Oid, Repository, Signature, Status, StatusOptions};
use std::path::{Path, PathBuf};

const SIGNATURE_NAME: &str = "System Launcher";
const SIGNATURE_EMAIL: &str = "launcher@local";

fn git_err(context: &'static str) -> impl Fn(git2::Error) -> Error {
    move |e| Error::Git(format!("{}: {}", context, e.message()))
}

pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Create the repository if it does not exist yet
    pub fn init(&self) -> Result<()> {
        if !self.is_initialized() {
            std::fs::create_dir_all(&self.path)?;
            Repository::init(&self.path).map_err(git_err("Failed to init repository"))?;
        }
        Ok(())
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.path).map_err(git_err("Failed to open repository"))
    }

    /// Stage additions, modifications and removals under the work tree.
    pub fn stage_all(&self) -> Result<()> {
        let repo = self.open()?;
        let mut index = repo.index().map_err(git_err("Failed to read index"))?;

        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .map_err(git_err("Failed to stage files"))?;
        index
            .update_all(["*"].iter(), None)
            .map_err(git_err("Failed to stage removals"))?;
        index.write().map_err(git_err("Failed to write index"))?;

        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<Oid> {
        let repo = self.open()?;
        let signature = Signature::now(SIGNATURE_NAME, SIGNATURE_EMAIL)
            .map_err(git_err("Failed to create signature"))?;

        let mut index = repo.index().map_err(git_err("Failed to read index"))?;
        let tree_id = index.write_tree().map_err(git_err("Failed to write tree"))?;
        let tree = repo
            .find_tree(tree_id)
            .map_err(git_err("Failed to find tree"))?;

        let parent = match repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .map_err(git_err("Failed to resolve HEAD"))?,
            ),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .map_err(git_err("Failed to create commit"))
    }

    /// Stage everything and commit, skipping the commit when the tree is clean.
    pub fn commit_all(&self, message: &str) -> Result<Option<Oid>> {
        self.stage_all()?;
        if !self.has_staged_changes()? {
            return Ok(None);
        }
        self.commit(message).map(Some)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let repo = self.open()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(false);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(git_err("Failed to read status"))?;

        Ok(statuses.iter().any(|entry| {
            entry.status().intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_DELETED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            )
        }))
    }

    pub fn has_changes(&self) -> Result<bool> {
        Ok(!self.status()?.is_empty())
    }

    /// Porcelain-style status lines, e.g. `?? notes.txt` or ` M a.txt`.
    pub fn status(&self) -> Result<Vec<String>> {
        let repo = self.open()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(git_err("Failed to read status"))?;

        Ok(statuses
            .iter()
            .filter_map(|entry| {
                let path = entry.path()?.to_string();
                Some(format!("{} {}", status_code(entry.status()), path))
            })
            .collect())
    }

    /// One-line log entries, newest first: `<short id> <summary>`.
    pub fn log(&self, limit: usize) -> Result<Vec<String>> {
        let repo = self.open()?;
        if repo.head().is_err() {
            return Ok(Vec::new());
        }

        let mut revwalk = repo.revwalk().map_err(git_err("Failed to walk history"))?;
        revwalk
            .push_head()
            .map_err(git_err("Failed to walk history"))?;

        let mut entries = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid.map_err(git_err("Failed to walk history"))?;
            let commit = repo
                .find_commit(oid)
                .map_err(git_err("Failed to read commit"))?;
            let short = oid.to_string();
            entries.push(format!(
                "{} {}",
                &short[..7.min(short.len())],
                commit.summary().unwrap_or_default()
            ));
        }

        Ok(entries)
    }

    pub fn current_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo.head().map_err(git_err("Failed to read HEAD"))?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| Error::Git("HEAD is not a named branch".to_string()))
    }

    pub fn last_commit_message(&self) -> Result<String> {
        let repo = self.open()?;
        let commit = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(git_err("Failed to read HEAD commit"))?;

        commit
            .message()
            .map(str::to_string)
            .ok_or_else(|| Error::Git("Commit message is not valid UTF-8".to_string()))
    }
}

fn status_code(status: Status) -> &'static str {
    if status.contains(Status::WT_NEW) {
        "??"
    } else if status.contains(Status::INDEX_NEW) {
        "A "
    } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        " D"
    } else if status.intersects(Status::INDEX_MODIFIED | Status::WT_MODIFIED) {
        " M"
    } else {
        "  "
    }
}
