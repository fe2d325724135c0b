#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::builder::{Confsearch, FinderBuilder};
    use crate::io::{FileReader, FsReader};

    /// Search places used by the engine tests. Unique enough that walking a
    /// temp directory's ancestors never collides with a real config file.
    pub const PLACES: [&str; 2] = [".cstestrc.json", "cstest.config.json"];

    /// A builder preconfigured with the test package and places.
    pub fn builder() -> FinderBuilder {
        Confsearch::builder("cstest").search_places(PLACES)
    }

    /// Real filesystem reads, counted. Lets tests assert that caching (or its
    /// absence) changes how often the filesystem is touched.
    pub struct CountingReader {
        reads: AtomicUsize,
    }

    impl CountingReader {
        pub fn new() -> Self {
            Self {
                reads: AtomicUsize::new(0),
            }
        }

        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FileReader for CountingReader {
        fn read_sync(&self, path: &Path) -> io::Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            FsReader.read_sync(path)
        }

        async fn read(&self, path: &Path) -> io::Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            FsReader.read(path).await
        }
    }

    /// A purely synthetic filesystem: content for the listed paths, absence
    /// for everything else. Lets tests exercise locations (like the platform
    /// config dir) without writing outside their sandbox.
    pub struct StaticReader {
        files: HashMap<PathBuf, String>,
    }

    impl StaticReader {
        pub fn new(files: impl IntoIterator<Item = (PathBuf, String)>) -> Self {
            Self {
                files: files.into_iter().collect(),
            }
        }
    }

    #[async_trait]
    impl FileReader for StaticReader {
        fn read_sync(&self, path: &Path) -> io::Result<Option<String>> {
            Ok(self.files.get(path).cloned())
        }

        async fn read(&self, path: &Path) -> io::Result<Option<String>> {
            self.read_sync(path)
        }
    }
}
