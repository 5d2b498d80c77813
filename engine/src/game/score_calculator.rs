use super::match_detector::Match;
use super::settings::ScoringSettings;
use super::types::{MIN_MATCH_LENGTH, Position};
use crate::log_debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreCalculator {
    settings: ScoringSettings,
}

impl ScoreCalculator {
    pub fn new(settings: ScoringSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Points for a single match. Fewer than three positions score nothing.
    pub fn calculate_score(&self, positions: &[Position], is_combo: bool, combo_count: u32) -> u32 {
        let count = positions.len();
        if count < MIN_MATCH_LENGTH {
            return 0;
        }

        let tiles = u32::try_from(count).unwrap_or(u32::MAX);
        let mut score = tiles.saturating_mul(self.settings.base_per_tile);
        if count == 4 {
            score = score.saturating_add(self.settings.four_match_bonus);
        } else if count >= 5 {
            score = score.saturating_add(self.settings.five_match_bonus);
        }
        if is_combo && combo_count > 0 {
            score = score.saturating_add(self.settings.combo_bonus.saturating_mul(combo_count));
        }

        log_debug!(
            "Score calculated: {} (tiles {}, combo {}, count {})",
            score,
            count,
            is_combo,
            combo_count
        );
        score
    }

    /// Sum over matches; the combo bonus applies to each match separately.
    pub fn calculate_total_score(&self, matches: &[Match], is_combo: bool, combo_count: u32) -> u32 {
        matches
            .iter()
            .map(|m| self.calculate_score(&m.positions, is_combo, combo_count))
            .fold(0, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Orientation, TileType};

    fn line(count: usize) -> Vec<Position> {
        (0..count).map(|col| Position::new(0, col)).collect()
    }

    #[test]
    fn test_base_and_size_bonuses() {
        let calculator = ScoreCalculator::default();
        assert_eq!(calculator.calculate_score(&line(2), false, 0), 0);
        assert_eq!(calculator.calculate_score(&line(3), false, 0), 30);
        assert_eq!(calculator.calculate_score(&line(4), false, 0), 60);
        assert_eq!(calculator.calculate_score(&line(5), false, 0), 100);
        assert_eq!(calculator.calculate_score(&line(6), false, 0), 110);
    }

    #[test]
    fn test_combo_bonus() {
        let calculator = ScoreCalculator::default();
        assert_eq!(calculator.calculate_score(&line(3), true, 2), 40);
        assert_eq!(calculator.calculate_score(&line(3), true, 0), 30);
        assert_eq!(calculator.calculate_score(&line(3), false, 4), 30);
    }

    #[test]
    fn test_total_applies_combo_per_match() {
        let calculator = ScoreCalculator::default();
        let matches = vec![
            Match { positions: line(3), tile: TileType::Red, orientation: Orientation::Horizontal },
            Match { positions: line(4), tile: TileType::Blue, orientation: Orientation::Horizontal },
        ];
        assert_eq!(calculator.calculate_total_score(&matches, false, 0), 90);
        assert_eq!(calculator.calculate_total_score(&matches, true, 1), 100);
        assert_eq!(calculator.calculate_total_score(&[], true, 3), 0);
    }

    #[test]
    fn test_huge_settings_saturate() {
        let calculator = ScoreCalculator::new(ScoringSettings {
            base_per_tile: 2_000_000_000,
            four_match_bonus: u32::MAX,
            five_match_bonus: u32::MAX,
            combo_bonus: u32::MAX,
        });
        assert_eq!(calculator.calculate_score(&line(3), false, 0), u32::MAX);
        assert_eq!(calculator.calculate_score(&line(4), true, 3), u32::MAX);

        let matches = vec![
            Match { positions: line(3), tile: TileType::Red, orientation: Orientation::Horizontal },
            Match { positions: line(5), tile: TileType::Blue, orientation: Orientation::Horizontal },
        ];
        assert_eq!(calculator.calculate_total_score(&matches, true, 2), u32::MAX);
    }

    #[test]
    fn test_custom_settings() {
        let calculator = ScoreCalculator::new(ScoringSettings {
            base_per_tile: 1,
            four_match_bonus: 2,
            five_match_bonus: 3,
            combo_bonus: 4,
        });
        assert_eq!(calculator.calculate_score(&line(4), true, 1), 10);
    }
}
