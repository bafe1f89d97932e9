use clap::Parser;
use plate_cut::error::CutError;
use plate_cut::packer::Packer;
use plate_cut::render;
use plate_cut::request::{MAX_PIECES, check_piece_total};
use plate_cut::types::{CutRequest, PackOptions, PackingResult, StockPlate};
use serde::Serialize;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "plate_cut",
    about = "Guillotine cutting planner for rectangular stock plates"
)]
struct Cli {
    /// Stock plate dimensions in mm (WxH, e.g. 1200x3000)
    #[arg(long)]
    plate: String,

    /// Cut pieces as WxH:qty (e.g. 600x1000:5 400x300:2)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Allow 90 degree rotation (ignores grain direction)
    #[arg(long)]
    allow_rotation: bool,

    /// Show ASCII layout of each plate
    #[arg(long)]
    layout: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Refuse to plan more than this many pieces
    #[arg(long, default_value_t = MAX_PIECES)]
    max_pieces: u64,

    /// Log engine progress to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<(i64, i64), CutError> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| CutError::invalid_dimensions(format!("'{s}', expected WxH")))?;
    let width = w
        .trim()
        .parse::<i64>()
        .map_err(|_| CutError::invalid_dimensions(format!("invalid width in '{s}'")))?;
    let height = h
        .trim()
        .parse::<i64>()
        .map_err(|_| CutError::invalid_dimensions(format!("invalid height in '{s}'")))?;
    Ok((width, height))
}

/// Request ids are assigned 1, 2, ... in argument order.
fn parse_cut(index: usize, s: &str) -> Result<CutRequest, CutError> {
    let (dims, qty) = s
        .split_once(':')
        .ok_or_else(|| CutError::invalid_dimensions(format!("cut '{s}', expected WxH:qty")))?;
    let (width, height) = parse_dimensions(dims)?;
    let quantity = qty
        .trim()
        .parse::<i64>()
        .map_err(|_| CutError::invalid_dimensions(format!("invalid quantity in '{s}'")))?;
    Ok(CutRequest::new(index as i64 + 1, width, height, quantity))
}

fn print_report(plate: StockPlate, result: &PackingResult, show_layout: bool) {
    for (i, layout) in result.layouts.iter().enumerate() {
        println!(
            "Plate {}: {} pieces, {:.2}% used, {} mm2 waste",
            i + 1,
            layout.piece_count(),
            layout.efficiency_percent,
            layout.waste_area
        );
        for p in &layout.pieces {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  #{} {} @ ({}, {}){}", p.piece_key(), p.rect(), p.x, p.y, rot);
        }
        if show_layout && let Some(bounds) = plate.bounds() {
            print!("{}", render::render_layout(bounds, layout));
        }
        println!();
    }

    if !result.unplaced.is_empty() {
        let keys: Vec<String> = result
            .unplaced
            .iter()
            .map(|u| format!("{}-{}", u.request_id, u.instance_index))
            .collect();
        println!("Unplaced: {}", keys.join(", "));
    }

    let summary = &result.summary;
    println!(
        "Summary: {} plate{} required, {} pieces placed, {:.2}% efficiency",
        summary.plates_required,
        if summary.plates_required == 1 { "" } else { "s" },
        summary.total_pieces_placed,
        summary.efficiency_percent,
    );
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CutError> {
    serde_json::to_string_pretty(value).map_err(|e| CutError::Output(e.to_string()))
}

fn run(cli: &Cli) -> Result<(), CutError> {
    let (width, height) = parse_dimensions(&cli.plate)?;
    let plate = StockPlate::new(width, height);

    let requests: Vec<CutRequest> = cli
        .cuts
        .iter()
        .enumerate()
        .map(|(i, c)| parse_cut(i, c))
        .collect::<Result<Vec<_>, _>>()?;
    check_piece_total(&requests, cli.max_pieces)?;

    let options = PackOptions {
        allow_rotation: cli.allow_rotation,
    };
    let result = Packer::new(plate, options).pack(&requests);

    if cli.json {
        println!("{}", to_json(&result)?);
    } else {
        print_report(plate, &result, cli.layout);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_cut::types::Rect;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("1200x3000").unwrap(), (1200, 3000));
        assert_eq!(parse_dimensions("0x10").unwrap(), (0, 10));
        assert!(parse_dimensions("1200").is_err());
        assert!(parse_dimensions("12ax30").is_err());
    }

    #[test]
    fn test_parse_cut_assigns_ids() {
        let cut = parse_cut(2, "600x1000:5").unwrap();
        assert_eq!(cut, CutRequest::new(3, 600, 1000, 5));
        // Zero quantity is left for the engine to skip.
        assert!(!parse_cut(0, "10x10:0").unwrap().is_valid());
        assert!(parse_cut(0, "10x10").is_err());
        assert!(parse_cut(0, "10x10:many").is_err());
    }

    #[test]
    fn test_to_json_result() {
        let result = PackingResult::default();
        let json = to_json(&result).unwrap();
        assert!(json.contains("\"plates_required\": 0"));
    }

    #[test]
    fn test_to_json_failure_is_an_error() {
        // Map keys that are not strings cannot be written as JSON.
        let mut bad = std::collections::BTreeMap::new();
        bad.insert((1, 2), "piece");
        let err = to_json(&bad).unwrap_err();
        assert!(matches!(err, CutError::Output(_)));
        assert!(err.to_string().starts_with("cannot write output"));
    }

    #[test]
    fn test_run_rejects_too_many_pieces() {
        let cli = Cli::parse_from([
            "plate_cut",
            "--plate",
            "100x100",
            "--cuts",
            "10x10:500",
            "--max-pieces",
            "100",
        ]);
        assert_eq!(
            run(&cli),
            Err(CutError::TooManyPieces {
                requested: 500,
                limit: 100,
            })
        );
    }

    #[test]
    fn test_plate_bounds_for_render() {
        let (w, h) = parse_dimensions("100x50").unwrap();
        assert_eq!(StockPlate::new(w, h).bounds(), Some(Rect::new(100, 50)));
    }
}
