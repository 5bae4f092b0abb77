use crate::log::{error_missing_template, Error, ErrorKind};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Resolves template names to template source text.
pub trait Loader: Sync + Send {
    /// Return the source text for the template with the given name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no template with that name exists.
    fn load(&self, name: &str) -> Result<String, Error>;
}

/// A [`Loader`] that treats the name itself as the template source.
///
/// This is the default loader, and makes `Engine::render` accept inline
/// template text directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringLoader;

impl Loader for StringLoader {
    #[inline]
    fn load(&self, name: &str) -> Result<String, Error> {
        Ok(name.to_owned())
    }
}

/// A [`Loader`] that reads templates from one or more directories.
///
/// The name `greeting` resolves to `<dir>/<prefix>greeting.<extension>`,
/// searching the directories in order. The extension defaults to
/// `handlebars` and the prefix to nothing.
#[derive(Debug, Clone)]
pub struct FilesystemLoader {
    paths: Vec<PathBuf>,
    prefix: String,
    extension: String,
}

impl FilesystemLoader {
    /// Create a new [`FilesystemLoader`] over the given directory.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the path is not a directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::with_paths(vec![path.as_ref().to_path_buf()])
    }

    /// Create a new [`FilesystemLoader`] searching the given directories in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when any path is not a directory.
    pub fn with_paths(paths: Vec<PathBuf>) -> Result<Self, Error> {
        for path in &paths {
            if !path.is_dir() {
                return Err(
                    Error::build(ErrorKind::Configuration, "invalid template directory")
                        .with_help(format!("`{}` is not a directory", path.display())),
                );
            }
        }

        Ok(Self {
            paths,
            prefix: String::new(),
            extension: "handlebars".to_owned(),
        })
    }

    /// Set the file name prefix and return the [`FilesystemLoader`].
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the file extension and return the [`FilesystemLoader`].
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Return the file that the given template name resolves to.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let file = format!("{}{}.{}", self.prefix, name, self.extension);
        self.paths
            .iter()
            .map(|path| path.join(&file))
            .find(|candidate| candidate.is_file())
    }
}

impl Loader for FilesystemLoader {
    fn load(&self, name: &str) -> Result<String, Error> {
        let path = self
            .resolve(name)
            .ok_or_else(|| error_missing_template(name))?;

        fs::read_to_string(&path).map_err(|_| {
            error_missing_template(name)
                .with_help(format!("`{}` exists but could not be read", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FilesystemLoader, Loader, StringLoader};
    use crate::log::ErrorKind;
    use std::fs;

    #[test]
    fn test_string_loader() {
        let text = "hello, {{name}}!";
        assert_eq!(StringLoader.load(text).unwrap(), text);
    }

    #[test]
    fn test_filesystem_loader_invalid_directory() {
        let result = FilesystemLoader::new("does/not/exist");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_filesystem_loader_missing_template() {
        let loader = FilesystemLoader::new(std::env::temp_dir()).unwrap();
        let result = loader.load("no-such-template");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_filesystem_loader_multiple_directories() {
        let first = std::env::temp_dir().join("vellum-loader-first");
        let second = std::env::temp_dir().join("vellum-loader-second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(second.join("footer.handlebars"), "bye").unwrap();

        let loader = FilesystemLoader::with_paths(vec![first.clone(), second.clone()]).unwrap();
        assert_eq!(loader.load("footer").unwrap(), "bye");

        fs::remove_dir_all(&first).unwrap();
        fs::remove_dir_all(&second).unwrap();
    }

    #[test]
    fn test_filesystem_loader_load() {
        let directory = std::env::temp_dir().join("vellum-loader-test");
        fs::create_dir_all(&directory).unwrap();
        fs::write(directory.join("_greeting.hbs"), "hello, {{name}}!").unwrap();

        let loader = FilesystemLoader::new(&directory)
            .unwrap()
            .with_prefix("_")
            .with_extension("hbs");
        assert_eq!(loader.load("greeting").unwrap(), "hello, {{name}}!");

        fs::remove_dir_all(&directory).unwrap();
    }
}
