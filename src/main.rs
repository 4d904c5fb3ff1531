//! Claw Machine entry point
//!
//! Native builds run a headless demo: a scripted run of attempts against a
//! JSON save file, logged as it goes. The web build is driven from JS through
//! `platform::WebClawMachine`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use claw_machine::ClawMachine;
    use claw_machine::persistence::FileStore;
    use claw_machine::sim::SessionEvent;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::var("CLAW_MACHINE_SAVE").unwrap_or_else(|_| "claw_save.json".to_string());
    let attempts: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    log::info!("Claw Machine (native) starting, saving to {}", path);
    let mut machine = ClawMachine::with_store(FileStore::new(path));
    log::info!(
        "Theme {}, {} wins so far",
        machine.theme().as_str(),
        machine.total_wins()
    );
    machine.start_session();

    // Let the pile settle
    for _ in 0..120 {
        machine.step_frame();
    }

    let mut won = 0;
    for attempt in 1..=attempts {
        // Aim at the highest plush (the easiest grab)
        let target = machine.session().and_then(|s| {
            s.bodies
                .iter()
                .filter(|b| b.is_free())
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|b| b.pos.x)
        });
        if let Some(x) = target {
            machine.pointer_moved(x);
        }
        for _ in 0..60 {
            machine.step_frame();
        }

        if !machine.request_attempt() {
            log::warn!("Attempt {} refused", attempt);
            continue;
        }
        for _ in 0..600 {
            for event in machine.step_frame() {
                match event {
                    SessionEvent::Won { item, .. } => {
                        won += 1;
                        println!(
                            "#{:<3} WON  {} {} [{}]",
                            attempt,
                            item.glyph,
                            item.name,
                            item.rarity.label()
                        );
                    }
                    SessionEvent::Lost { .. } => println!("#{:<3} lost", attempt),
                    _ => {}
                }
            }
            if !machine.is_busy() {
                break;
            }
        }
    }

    machine.end_session();

    let (owned, total, percent) = machine.progress();
    println!(
        "\n{}/{} won this run; collection {}/{} ({}%), {} total wins",
        won,
        attempts,
        owned,
        total,
        percent,
        machine.total_wins()
    );
    for slot in machine.collection() {
        if slot.owned {
            println!("  {} {:<14} x{}", slot.entry.glyph, slot.entry.name, slot.count);
        } else {
            println!("  ?  {:<14} locked", "???");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `WebClawMachine`, this is just to satisfy the compiler
}
