use crate::error::BlogError;
use std::{fs, path::Path};
use tracing::debug;

/// Read the database password from a mounted secret file.
///
/// One trailing line terminator is dropped so files written with `echo`
/// work; anything else in the file is part of the password.
pub fn load_secret(path: &Path) -> Result<String, BlogError> {
    let raw = fs::read_to_string(path).map_err(|source| BlogError::Secret {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded database secret");
    Ok(strip_line_ending(raw))
}

fn strip_line_ending(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    fn temp_secret(name: &str, contents: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("blog-secret-{}-{}-{}", name, std::process::id(), nanos));
        fs::write(&path, contents).expect("failed to write temp secret");
        path
    }

    #[test]
    fn reads_plain_secret() {
        let path = temp_secret("plain", "s3cret");
        assert_eq!(load_secret(&path).unwrap(), "s3cret");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn drops_exactly_one_trailing_newline() {
        let path = temp_secret("lf", "s3cret\n");
        assert_eq!(load_secret(&path).unwrap(), "s3cret");
        let _ = fs::remove_file(&path);

        let path = temp_secret("crlf", "s3cret\r\n");
        assert_eq!(load_secret(&path).unwrap(), "s3cret");
        let _ = fs::remove_file(&path);

        let path = temp_secret("double", "s3cret\n\n");
        assert_eq!(load_secret(&path).unwrap(), "s3cret\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn keeps_inner_whitespace() {
        let path = temp_secret("spaces", " pass word ");
        assert_eq!(load_secret(&path).unwrap(), " pass word ");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_a_secret_error() {
        let path = std::env::temp_dir().join("blog-secret-that-does-not-exist");
        match load_secret(&path) {
            Err(BlogError::Secret { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Secret error, got {other:?}"),
        }
    }
}
