use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use super::{SAVE_FILE_EXTENSION, SAVE_VERSION};
use crate::game::GameStateData;
use crate::{log, log_warn};

#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Encode(serde_yaml_ng::Error),
    Decode(serde_yaml_ng::Error),
    UnsupportedVersion { found: u8, expected: u8 },
    EmptyFile,
    Malformed(String),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Encode(e) => write!(f, "Encode error: {}", e),
            SaveError::Decode(e) => write!(f, "Decode error: {}", e),
            SaveError::UnsupportedVersion { found, expected } => {
                write!(f, "Unsupported save version: found {}, expected {}", found, expected)
            }
            SaveError::EmptyFile => write!(f, "Empty save file"),
            SaveError::Malformed(reason) => write!(f, "Malformed save: {}", reason),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Encode(e) | SaveError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for SaveError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        SaveError::Decode(e)
    }
}

pub fn save_game(path: &Path, data: &GameStateData) -> Result<(), SaveError> {
    let bytes = save_game_to_bytes(data)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;

    log!("Game saved to {} (score {}, moves {})", path.display(), data.score, data.moves);
    Ok(())
}

pub fn save_game_to_bytes(data: &GameStateData) -> Result<Vec<u8>, SaveError> {
    let encoded = serde_yaml_ng::to_string(data).map_err(SaveError::Encode)?;
    let mut result = vec![SAVE_VERSION];
    result.extend(encoded.into_bytes());
    Ok(result)
}

pub fn load_game(path: &Path) -> Result<GameStateData, SaveError> {
    let mut file = std::fs::File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    load_game_from_bytes(&buffer)
}

pub fn load_game_from_bytes(bytes: &[u8]) -> Result<GameStateData, SaveError> {
    let Some((&version, payload)) = bytes.split_first() else {
        return Err(SaveError::EmptyFile);
    };
    if version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: version,
            expected: SAVE_VERSION,
        });
    }

    let text = std::str::from_utf8(payload)
        .map_err(|e| SaveError::Malformed(format!("payload is not UTF-8: {}", e)))?;
    let data: GameStateData = serde_yaml_ng::from_str(text)?;
    if !data.is_well_formed() {
        return Err(SaveError::Malformed("grid is empty or not rectangular".to_string()));
    }
    Ok(data)
}

/// Any failure, including a missing file, reads as "no save".
pub fn load_game_or_none(path: &Path) -> Option<GameStateData> {
    match load_game(path) {
        Ok(data) => {
            log!("Game loaded from {}", path.display());
            Some(data)
        }
        Err(SaveError::Io(e)) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            log_warn!("Ignoring unreadable save {}: {}", path.display(), e);
            None
        }
    }
}

pub fn has_save(path: &Path) -> bool {
    path.is_file()
}

pub fn clear_save(path: &Path) -> Result<(), SaveError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log!("Save cleared: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SaveError::Io(e)),
    }
}

pub fn generate_save_filename() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    format!("{}_MATCH3.{}", timestamp, SAVE_FILE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GamePhase, TileType};

    fn sample_data() -> GameStateData {
        GameStateData {
            phase: GamePhase::Playing,
            score: 145,
            moves: 3,
            grid: vec![
                vec![Some(TileType::Red), Some(TileType::Blue), None],
                vec![Some(TileType::Pink), Some(TileType::Green), Some(TileType::Orange)],
            ],
            timestamp: 1_700_000_000_000,
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("match3_{}_{}.{}", name, std::process::id(), SAVE_FILE_EXTENSION))
    }

    #[test]
    fn test_save_load_bytes() {
        let data = sample_data();
        let bytes = save_game_to_bytes(&data).unwrap();
        assert_eq!(bytes[0], SAVE_VERSION);
        assert_eq!(load_game_from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn test_load_empty_file_error() {
        assert!(matches!(load_game_from_bytes(&[]), Err(SaveError::EmptyFile)));
    }

    #[test]
    fn test_load_unsupported_version_error() {
        let result = load_game_from_bytes(&[7, b'a']);
        assert!(matches!(result, Err(SaveError::UnsupportedVersion { found: 7, expected: 1 })));
    }

    #[test]
    fn test_load_garbage_payload_error() {
        let mut bytes = vec![SAVE_VERSION];
        bytes.extend_from_slice(b"phase: [unterminated");
        assert!(matches!(load_game_from_bytes(&bytes), Err(SaveError::Decode(_))));

        let mut bytes = vec![SAVE_VERSION];
        bytes.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(load_game_from_bytes(&bytes), Err(SaveError::Malformed(_))));
    }

    #[test]
    fn test_load_ragged_grid_is_malformed() {
        let mut data = sample_data();
        data.grid[0].pop();
        let bytes = save_game_to_bytes(&data).unwrap();
        assert!(matches!(load_game_from_bytes(&bytes), Err(SaveError::Malformed(_))));
    }

    #[test]
    fn test_file_round_trip_and_clear() {
        let path = temp_path("round_trip");
        let data = sample_data();

        save_game(&path, &data).unwrap();
        assert!(has_save(&path));
        assert_eq!(load_game(&path).unwrap(), data);

        clear_save(&path).unwrap();
        assert!(!has_save(&path));
        clear_save(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_no_save() {
        let path = temp_path("corrupt");
        std::fs::write(&path, [SAVE_VERSION, b'{', b'{']).unwrap();
        assert!(load_game_or_none(&path).is_none());
        std::fs::remove_file(&path).unwrap();

        assert!(load_game_or_none(&temp_path("missing")).is_none());
    }

    #[test]
    fn test_generate_save_filename() {
        let filename = generate_save_filename();
        assert!(filename.ends_with(".match3save"));
        assert!(filename.contains("MATCH3"));
    }
}
