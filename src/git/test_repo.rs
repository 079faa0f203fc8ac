//! Throwaway repositories for unit tests.
//!
//! Every commit is built from an in-memory index, so the tree holds exactly
//! the files passed in and nothing from the working directory.

use anyhow::Result;
use git2::{FileMode, Index, IndexEntry, IndexTime, Oid, Repository, Signature, Time};
use std::path::Path;
use tempfile::TempDir;

pub(crate) struct TestRepo {
    dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    pub(crate) fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let repo = Repository::init(dir.path())?;
        Ok(Self { dir, repo })
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Commit on top of `HEAD` and advance it.
    pub(crate) fn commit(&self, files: &[(&str, &str)], time: i64) -> Result<Oid> {
        self.commit_with_offset(files, time, 0)
    }

    pub(crate) fn commit_with_offset(
        &self,
        files: &[(&str, &str)],
        time: i64,
        offset_minutes: i32,
    ) -> Result<Oid> {
        let files: Vec<(&str, &[u8])> = files.iter().map(|(p, d)| (*p, d.as_bytes())).collect();
        self.commit_raw(&files, time, offset_minutes)
    }

    pub(crate) fn commit_raw(
        &self,
        files: &[(&str, &[u8])],
        time: i64,
        offset_minutes: i32,
    ) -> Result<Oid> {
        let parents = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit()?.id()],
            Err(_) => Vec::new(),
        };
        self.write_commit(Some("HEAD"), files, &parents, time, offset_minutes)
    }

    /// Commit with explicit parents without moving any reference.
    pub(crate) fn commit_detached(
        &self,
        files: &[(&str, &str)],
        parents: &[Oid],
        time: i64,
    ) -> Result<Oid> {
        let files: Vec<(&str, &[u8])> = files.iter().map(|(p, d)| (*p, d.as_bytes())).collect();
        self.write_commit(None, &files, parents, time, 0)
    }

    /// Merge commit on `HEAD`; `first` must be the current `HEAD` commit.
    pub(crate) fn merge(
        &self,
        files: &[(&str, &str)],
        first: Oid,
        second: Oid,
        time: i64,
    ) -> Result<Oid> {
        let files: Vec<(&str, &[u8])> = files.iter().map(|(p, d)| (*p, d.as_bytes())).collect();
        self.write_commit(Some("HEAD"), &files, &[first, second], time, 0)
    }

    fn write_commit(
        &self,
        update_ref: Option<&str>,
        files: &[(&str, &[u8])],
        parents: &[Oid],
        time: i64,
        offset_minutes: i32,
    ) -> Result<Oid> {
        let mut index = Index::new()?;
        self.repo.set_index(&mut index)?;
        for (path, data) in files {
            index.add_frombuffer(&index_entry(path), data)?;
        }
        let tree_id = index.write_tree_to(&self.repo)?;
        let tree = self.repo.find_tree(tree_id)?;

        let sig = Signature::new(
            "Test User",
            "test@example.com",
            &Time::new(time, offset_minutes),
        )?;
        let parents = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid))
            .collect::<Result<Vec<_>, _>>()?;
        let parent_refs: Vec<_> = parents.iter().collect();

        let message = format!("commit at {}", time);
        Ok(self
            .repo
            .commit(update_ref, &sig, &sig, &message, &tree, &parent_refs)?)
    }
}

fn index_entry(path: &str) -> IndexEntry {
    IndexEntry {
        ctime: IndexTime::new(0, 0),
        mtime: IndexTime::new(0, 0),
        dev: 0,
        ino: 0,
        mode: FileMode::Blob.into(),
        uid: 0,
        gid: 0,
        file_size: 0,
        id: Oid::zero(),
        flags: 0,
        flags_extended: 0,
        path: path.into(),
    }
}
