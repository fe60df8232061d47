use std::{
    error::Error,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use log::{info, warn};
use shellexpand::full;

pub use glazebar_proto::config::*;

/// Resolve and read the configuration file.
///
/// A provided path must exist; the default path is created on demand and a
/// missing or unparsable file degrades to [`Config::default`].
pub fn get_config(path: Option<PathBuf>) -> Result<(Config, PathBuf), Box<dyn Error + Send>> {
    match path {
        Some(path) => {
            info!("Config path provided {path:?}");
            expand_path(path).and_then(|expanded| {
                if !expanded.exists() {
                    Err(Box::new(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("Config file does not exist: {}", expanded.display()),
                    )) as Box<dyn Error + Send>)
                } else {
                    Ok((read_config(&expanded).unwrap_or_default(), expanded))
                }
            })
        }
        None => expand_path(PathBuf::from(DEFAULT_CONFIG_FILE_PATH)).and_then(|expanded| {
            let parent = expanded.parent().ok_or_else(|| {
                Box::new(std::io::Error::other(
                    "default config path has no parent directory",
                )) as Box<dyn Error + Send>
            })?;

            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Box::new(e) as Box<dyn Error + Send>)?;
            }

            Ok((read_config(&expanded).unwrap_or_default(), expanded))
        }),
    }
}

fn expand_path(path: PathBuf) -> Result<PathBuf, Box<dyn Error + Send>> {
    let str_path = path.to_string_lossy();
    let expanded = full(&str_path).map_err(|e| Box::new(e) as Box<dyn Error + Send>)?;

    Ok(PathBuf::from(expanded.to_string()))
}

fn read_config(path: &Path) -> Result<Config, Box<dyn Error + Send>> {
    let mut content = String::new();
    let read_result = File::open(path).and_then(|mut file| file.read_to_string(&mut content));

    match read_result {
        Ok(_) => {
            info!("Decoding config file {path:?}");

            match toml::from_str(&content) {
                Ok(config) => {
                    info!("Config file loaded successfully");
                    Ok(config)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Err(Box::new(e))
                }
            }
        }
        Err(e) => {
            warn!("Failed to read config file: {e}");

            Err(Box::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_valid_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "log_level = \"warn\"\n[date]\nformat = \"%H:%M\"").expect("write");

        let config = read_config(file.path()).expect("config parses");

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.date.format, "%H:%M");
    }

    #[test]
    fn rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "log_level = [broken").expect("write");

        assert!(read_config(file.path()).is_err());
    }

    #[test]
    fn provided_path_falls_back_to_defaults_on_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "not toml at all [[[").expect("write");

        let (config, path) =
            get_config(Some(file.path().to_path_buf())).expect("existing path accepted");

        assert_eq!(config, Config::default());
        assert_eq!(path, file.path());
    }

    #[test]
    fn missing_provided_path_is_an_error() {
        let result = get_config(Some(PathBuf::from("/nonexistent/glazebar.toml")));

        assert!(result.is_err());
    }
}
