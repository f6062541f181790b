//! File tree capability surface.
//!
//! Every path handed out by a [`FileTree`] is relative to the tree root and
//! never starts with a separator; the root folder itself has the empty path.
//! [`Folder`] and [`File`] are plain handles, the tree owns what they point at.

use std::{
    cell::RefCell,
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::path::{concat_path, file_name, parent_path};

/// A folder inside a [`FileTree`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Folder {
    path: String,
}

impl Folder {
    /// The root folder of a tree.
    pub fn root() -> Self {
        Self {
            path: String::new(),
        }
    }

    fn at(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Path relative to the tree root; empty for the root itself.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The folder's own name; empty for the root.
    pub fn name(&self) -> &str {
        file_name(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Path of a child entry named `name`.
    pub fn child_path(&self, name: &str) -> String {
        concat_path(&self.path, name)
    }
}

/// A file inside a [`FileTree`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File {
    path: String,
}

impl File {
    fn at(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Path relative to the tree root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        file_name(&self.path)
    }

    /// Path of the folder containing this file.
    pub fn parent_path(&self) -> &str {
        parent_path(&self.path)
    }
}

/// Outcome of [`FileTree::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// The file did not exist and was created.
    Created,
    /// The file existed with different content and was overwritten.
    Updated,
    /// The file already had exactly this content.
    Unchanged,
}

/// Minimal set of operations the discovery engine needs from a host file tree.
///
/// Listing a folder that cannot be read yields an empty listing, and every
/// `find_*` lookup answers `None` for missing entries. Only reading and
/// writing report I/O errors.
pub trait FileTree {
    /// Subfolders of a folder, sorted by name.
    fn folders(&self, folder: &Folder) -> Vec<Folder>;

    /// Files directly inside a folder, sorted by name.
    fn files(&self, folder: &Folder) -> Vec<File>;

    /// Read a file as UTF-8 text.
    fn read(&self, file: &File) -> io::Result<String>;

    /// Overwrite a file's content.
    fn write(&self, file: &File, content: &str) -> io::Result<()>;

    /// Create a folder (and any missing parents) at a relative path.
    fn create_folder(&self, path: &str) -> io::Result<Folder>;

    /// Create an empty file (and any missing parents) unless it already exists.
    fn create_file(&self, path: &str) -> io::Result<File>;

    fn root(&self) -> Folder {
        Folder::root()
    }

    /// Look up a folder by relative path.
    fn find_folder(&self, path: &str) -> Option<Folder> {
        let mut current = self.root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self
                .folders(&current)
                .into_iter()
                .find(|f| f.name() == segment)?;
        }
        Some(current)
    }

    /// Look up a file by relative path.
    fn find_file(&self, path: &str) -> Option<File> {
        let path = path.trim_start_matches('/');
        let folder = self.find_folder(parent_path(path))?;
        let name = file_name(path);
        self.files(&folder).into_iter().find(|f| f.name() == name)
    }

    /// Every file below a folder, at any depth.
    fn all_files(&self, folder: &Folder) -> Vec<File> {
        let mut found = Vec::new();
        let mut stack = vec![folder.clone()];
        while let Some(current) = stack.pop() {
            found.extend(self.files(&current));
            stack.extend(self.folders(&current).into_iter().rev());
        }
        found
    }

    /// Every folder below a folder, at any depth, excluding the folder itself.
    fn all_folders(&self, folder: &Folder) -> Vec<Folder> {
        let mut found = Vec::new();
        let mut stack = self.folders(folder);
        stack.reverse();
        while let Some(current) = stack.pop() {
            let mut children = self.folders(&current);
            children.reverse();
            stack.extend(children);
            found.push(current);
        }
        found
    }

    /// Write content to a path, creating the file if needed.
    fn save(&self, path: &str, content: &str) -> io::Result<WriteResult> {
        match self.find_file(path) {
            Some(file) => {
                if self.read(&file).is_ok_and(|existing| existing == content) {
                    return Ok(WriteResult::Unchanged);
                }
                self.write(&file, content)?;
                Ok(WriteResult::Updated)
            }
            None => {
                let file = self.create_file(path)?;
                self.write(&file, content)?;
                Ok(WriteResult::Created)
            }
        }
    }
}

#[derive(Debug, Default)]
struct Listing {
    folders: Vec<Folder>,
    files: Vec<File>,
}

/// A [`FileTree`] over a directory of the local filesystem.
///
/// Folder listings are read once and cached; creating entries through the
/// tree drops the affected cached listings.
#[derive(Debug)]
pub struct LocalTree {
    root: PathBuf,
    cache: RefCell<HashMap<String, Rc<Listing>>>,
}

impl LocalTree {
    /// Open a tree rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' is not a directory", root.display()),
            ));
        }
        Ok(Self {
            root,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// The directory this tree is rooted at.
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// Absolute filesystem location of a relative path.
    pub fn absolute(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, s| acc.join(s))
    }

    fn listing(&self, folder: &Folder) -> Rc<Listing> {
        if let Some(cached) = self.cache.borrow().get(folder.path()) {
            return Rc::clone(cached);
        }
        let listing = Rc::new(self.read_listing(folder));
        self.cache
            .borrow_mut()
            .insert(folder.path().to_string(), Rc::clone(&listing));
        listing
    }

    fn read_listing(&self, folder: &Folder) -> Listing {
        let mut listing = Listing::default();
        let Ok(entries) = fs::read_dir(self.absolute(folder.path())) else {
            return listing;
        };
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Ok(kind) = entry.file_type() else {
                continue;
            };
            let path = folder.child_path(&name);
            if kind.is_dir() {
                listing.folders.push(Folder::at(path));
            } else if kind.is_file() {
                listing.files.push(File::at(path));
            }
        }
        listing.folders.sort();
        listing.files.sort();
        listing
    }

    fn invalidate(&self, path: &str) {
        let mut cache = self.cache.borrow_mut();
        cache.remove(path);
        let mut current = parent_path(path);
        loop {
            cache.remove(current);
            if current.is_empty() {
                break;
            }
            current = parent_path(current);
        }
    }
}

impl FileTree for LocalTree {
    fn folders(&self, folder: &Folder) -> Vec<Folder> {
        self.listing(folder).folders.clone()
    }

    fn files(&self, folder: &Folder) -> Vec<File> {
        self.listing(folder).files.clone()
    }

    fn read(&self, file: &File) -> io::Result<String> {
        fs::read_to_string(self.absolute(file.path()))
    }

    fn write(&self, file: &File, content: &str) -> io::Result<()> {
        fs::write(self.absolute(file.path()), content)
    }

    fn create_folder(&self, path: &str) -> io::Result<Folder> {
        let path = concat_path("", path);
        fs::create_dir_all(self.absolute(&path))?;
        self.invalidate(&path);
        Ok(Folder::at(path.trim_end_matches('/')))
    }

    fn create_file(&self, path: &str) -> io::Result<File> {
        let path = concat_path("", path);
        let absolute = self.absolute(&path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        if !absolute.exists() {
            fs::write(&absolute, "")?;
        }
        self.invalidate(&path);
        Ok(File::at(path))
    }
}
