use std::env;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tarots::draw;
use tarots::TarotsPlugin;

fn main() {
    tarots::init_tracing();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: tarot_tester <SUBCOMMAND> [--base <DIR>] [...options]\n  SUBCOMMANDS: draw | stats | check");
        std::process::exit(1);
    }

    let sub = args[1].as_str();
    let base_dir = PathBuf::from(parse_flag_value(&args, "--base").unwrap_or_else(|| ".".to_string()));
    let card_type = parse_flag_value(&args, "--type").unwrap_or_else(|| "全部".to_string());
    let spread = parse_flag_value(&args, "--spread").unwrap_or_else(|| "单张".to_string());
    let seed: Option<u64> = parse_flag_value(&args, "--seed").and_then(|v| v.parse().ok());

    let plugin = match TarotsPlugin::init(&base_dir) {
        Ok(plugin) => plugin,
        Err(e) => {
            eprintln!("init error: {}", e);
            std::process::exit(1);
        }
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match sub {
        "draw" => {
            if let Err(e) = print_draw(&plugin, &card_type, &spread, &mut rng) {
                eprintln!("draw error: {}", e);
                std::process::exit(1);
            }
        }
        "stats" => {
            let count: usize = parse_flag_value(&args, "--count").and_then(|v| v.parse().ok()).unwrap_or(1000);
            if let Err(e) = print_stats(&plugin, &card_type, &spread, count, &mut rng) {
                eprintln!("stats error: {}", e);
                std::process::exit(1);
            }
        }
        "check" => match plugin.check_assets() {
            Ok(missing) if missing.is_empty() => println!("✅ all images present"),
            Ok(missing) => {
                for name in &missing {
                    println!("missing: {}", name);
                }
                println!("{} missing", missing.len());
            }
            Err(e) => {
                eprintln!("check error: {}", e);
                std::process::exit(1);
            }
        },
        _ => {
            eprintln!("unknown subcommand: {}", sub);
            std::process::exit(1);
        }
    }
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn print_draw(plugin: &TarotsPlugin, card_type: &str, spread: &str, rng: &mut StdRng) -> tarots::Result<()> {
    let deck = plugin.deck().ok_or(tarots::TarotError::NoDeck)?;
    let result = draw::draw(&deck.cards, plugin.spreads(), card_type, spread, rng)?;
    println!("deck={} spread={} type={}", deck.name, result.spread_name, result.card_type.label());
    for card in &result.cards {
        println!(
            "{:>2} [{}] {} ({}) id={} - {}",
            card.position_name,
            card.position_meaning,
            card.name,
            card.orientation_label(),
            card.card_id,
            card.description
        );
    }
    Ok(())
}

fn print_stats(plugin: &TarotsPlugin, card_type: &str, spread: &str, count: usize, rng: &mut StdRng) -> tarots::Result<()> {
    let deck = plugin.deck().ok_or(tarots::TarotError::NoDeck)?;
    let mut cards = 0usize;
    let mut reversed = 0usize;
    for _ in 0..count {
        let result = draw::draw(&deck.cards, plugin.spreads(), card_type, spread, rng)?;
        cards += result.cards.len();
        reversed += result.reversed_count();
    }
    let rate = if cards == 0 { 0.0 } else { reversed as f64 / cards as f64 };
    println!("draws={} cards={} reversed={} rate={:.4}", count, cards, reversed, rate);
    Ok(())
}
