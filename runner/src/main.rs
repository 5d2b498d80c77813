use std::path::PathBuf;

use clap::Parser;
use match3_engine::config::load_engine_config;
use match3_engine::game::GameAction;
use match3_engine::logger::{self, LogLevel};
use match3_engine::storage::{load_game_or_none, save_game};
use match3_engine::{GameController, Position, SessionRng, SwapOutcome, log, log_warn};

#[derive(Parser)]
#[command(name = "match3_runner", about = "Headless match-3 session driver")]
struct Args {
    /// YAML engine config; defaults are used when the file is missing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tile RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Save file, restored at start when valid and written at the end
    #[arg(long)]
    save: Option<PathBuf>,

    /// Scripted swap as `row,col:row,col`, may be repeated
    #[arg(long = "swap", value_parser = parse_swap)]
    swaps: Vec<(Position, Position)>,

    /// Number of random adjacent swaps to attempt after the scripted ones
    #[arg(long, default_value_t = 0)]
    random_swaps: usize,

    #[arg(long)]
    use_log_prefix: bool,

    #[arg(long)]
    verbose: bool,

    #[arg(long)]
    print_actions: bool,
}

fn parse_position(text: &str) -> Result<Position, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{}`", text))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("bad row `{}`: {}", row, e))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("bad col `{}`: {}", col, e))?;
    Ok(Position::new(row, col))
}

fn parse_swap(text: &str) -> Result<(Position, Position), String> {
    let (from, to) = text
        .split_once(':')
        .ok_or_else(|| format!("expected `row,col:row,col`, got `{}`", text))?;
    Ok((parse_position(from)?, parse_position(to)?))
}

fn random_adjacent_pair(rng: &mut SessionRng, rows: usize, cols: usize) -> Option<(Position, Position)> {
    let horizontal = rng.random_range(0..2) == 0;
    if horizontal && cols > 1 {
        let from = Position::new(rng.random_index(rows), rng.random_index(cols - 1));
        Some((from, Position::new(from.row, from.col + 1)))
    } else if rows > 1 {
        let from = Position::new(rng.random_index(rows - 1), rng.random_index(cols));
        Some((from, Position::new(from.row + 1, from.col)))
    } else {
        None
    }
}

fn print_actions(actions: &[GameAction]) -> Result<(), serde_yaml_ng::Error> {
    let yaml = serde_yaml_ng::to_string(actions)?;
    for line in yaml.lines() {
        println!("    {}", line);
    }
    Ok(())
}

fn play_swap(
    controller: &mut GameController,
    from: Position,
    to: Position,
    show_actions: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = controller.try_swap(from, to)?;
    controller.finish_playback();

    let summary = match result.outcome {
        SwapOutcome::Invalid => "invalid".to_string(),
        SwapOutcome::Busy => "busy".to_string(),
        SwapOutcome::NoMatch => "no match, reverted".to_string(),
        SwapOutcome::Matched { cascade_steps } => format!("matched, {} cascade steps", cascade_steps),
    };
    println!("swap {} <-> {}: {}", from, to, summary);

    if show_actions && !result.actions.is_empty() {
        print_actions(&result.actions)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    let min_level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logger::init_logger(prefix, min_level);

    let config = load_engine_config(args.config.as_deref())?;
    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let seed = rng.seed();
    let mut controller = GameController::new(&config, rng)?;
    controller.start();

    if let Some(path) = &args.save
        && let Some(data) = load_game_or_none(path)
        && !controller.restore_snapshot_data(&data)
    {
        log_warn!("Save {} does not fit the configured grid, starting fresh", path.display());
    }

    log!("Session started with seed {}", seed);
    println!("{}\n", controller.render_grid());

    for &(from, to) in &args.swaps {
        play_swap(&mut controller, from, to, args.print_actions)?;
    }

    let (rows, cols) = controller.grid_size();
    let mut swap_rng = SessionRng::new(seed.wrapping_add(1));
    for _ in 0..args.random_swaps {
        let Some((from, to)) = random_adjacent_pair(&mut swap_rng, rows, cols) else {
            break;
        };
        play_swap(&mut controller, from, to, args.print_actions)?;
    }

    let status = controller.status();
    println!("\n{}\n", controller.render_grid());
    println!(
        "phase: {}, score: {}, moves: {}",
        status.phase, status.score, status.moves
    );

    if let Some(path) = &args.save {
        save_game(path, &controller.snapshot_data())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap() {
        let (from, to) = parse_swap("2,3:2,4").unwrap();
        assert_eq!(from, Position::new(2, 3));
        assert_eq!(to, Position::new(2, 4));

        assert_eq!(parse_swap(" 0, 1 : 1,1").unwrap().0, Position::new(0, 1));
        assert!(parse_swap("2,3").is_err());
        assert!(parse_swap("a,3:2,4").is_err());
        assert!(parse_swap("2,3:2").is_err());
    }

    #[test]
    fn test_random_pairs_are_adjacent_and_in_bounds() {
        let mut rng = SessionRng::new(5);
        for _ in 0..200 {
            let (from, to) = random_adjacent_pair(&mut rng, 8, 6).unwrap();
            assert!(from.is_adjacent(to));
            assert!(to.row < 8 && to.col < 6);
        }
        assert!(random_adjacent_pair(&mut rng, 1, 1).is_none());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "match3_runner",
            "--seed",
            "9",
            "--swap",
            "0,0:0,1",
            "--swap",
            "1,0:2,0",
            "--random-swaps",
            "5",
            "--print-actions",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.swaps.len(), 2);
        assert_eq!(args.random_swaps, 5);
        assert!(args.print_actions);
        assert!(!args.verbose);
    }
}
