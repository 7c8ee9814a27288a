use std::io::Write;

use bevy::prelude::*;
use color_mixer::{parse_command, ConsoleCommand, Session};
use mix_config::GameRules;
use mix_core::Palette;
use mix_game::{FeedbackKind, FrameCounter, MixGamePlugin, Mode};

fn session(rules: GameRules) -> Session {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    Session::new(
        app,
        MixGamePlugin::new(Palette::classic(), GameRules { rng_seed: Some(3), ..rules }),
    )
}

fn run(s: &mut Session, line: &str) -> Vec<String> {
    let cmd = parse_command(line, s.palette()).unwrap().expect("a command");
    s.run(cmd).unwrap()
}

#[test]
fn practice_mix_prints_result_and_view() {
    let mut s = session(GameRules::default());
    run(&mut s, "pick 1 red");
    run(&mut s, "pick 2 blue");
    let out = run(&mut s, "mix");
    assert_eq!(out[0], "result: Purple (#823A84)");
    assert!(out.last().unwrap().contains("result: Purple (#823A84)"));
    assert!(out.last().unwrap().starts_with("mode: practice"));
}

#[test]
fn validation_message_is_shown() {
    let mut s = session(GameRules::default());
    let out = run(&mut s, "mix");
    assert_eq!(out[0], "Please select both colors before mixing!");
    assert!(s.view().result.is_none());
}

#[test]
fn practice_rejects_hint_quietly() {
    let mut s = session(GameRules::default());
    let out = run(&mut s, "hint");
    // only the rendered view, no message
    assert_eq!(out.len(), 1);
    assert_eq!(s.view().mode, Mode::Practice);
}

#[test]
fn wait_fires_auto_advance() {
    let mut s = session(GameRules::default());
    run(&mut s, "mode game");
    let target = s.game().target().unwrap();
    let p = s.palette().clone();
    let hint = p.table().pairs_producing(target).next().copied().unwrap();
    let (first, second) = (hint.first, hint.second);
    run(&mut s, &format!("pick 1 {}", p.display_name(first)));
    run(&mut s, &format!("pick 2 {}", p.display_name(second)));
    let out = run(&mut s, "check");
    assert!(out[0].contains("correct, score 1"), "{out:?}");
    assert_eq!(s.view().feedback.kind, FeedbackKind::Correct);
    assert_eq!(s.game().target(), Some(target));

    let out = run(&mut s, "wait 1000");
    assert_eq!(out.len(), 1, "nothing fires before the delay: {out:?}");
    assert_eq!(s.view().feedback.kind, FeedbackKind::Correct);

    let out = run(&mut s, "wait 1000");
    assert!(out[0].starts_with("next round"), "{out:?}");
    let v = s.view();
    assert!(v.selection.is_empty());
    assert!(v.feedback.is_none());
    assert_eq!(v.score, Some(1));
}

#[test]
fn journal_dumps_json() {
    let mut s = session(GameRules::default());
    run(&mut s, "pick 1 red");
    run(&mut s, "mix");
    let out = run(&mut s, "journal");
    let value: serde_json::Value = serde_json::from_str(&out[0]).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[1]["result"].get("Err").is_some());
}

#[test]
fn script_file_parses_line_by_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# warm-up\npick 1 yellow\n\npick 2 #1F4F99\nmix\nquit").unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();
    let palette = Palette::classic();
    let commands: Vec<ConsoleCommand> = text
        .lines()
        .filter_map(|l| parse_command(l, &palette).unwrap())
        .collect();
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[3], ConsoleCommand::Quit);

    let mut s = session(GameRules::default());
    let mut last = Vec::new();
    for cmd in commands.into_iter().take(3) {
        last = s.run(cmd).unwrap();
    }
    assert_eq!(last[0], "result: Green (#2A892D)");
}

#[test]
fn huge_wait_returns_promptly() {
    let mut s = session(GameRules::default());
    let frame = |s: &Session| s.app().world().resource::<FrameCounter>().0;
    let before = frame(&s);
    let out = run(&mut s, "wait 18446744073709551615");
    assert_eq!(out.len(), 1);
    assert_eq!(frame(&s), before, "nothing pending, no frames needed");

    run(&mut s, "mode game");
    let target = s.game().target().unwrap();
    let p = s.palette().clone();
    let hint = p.table().pairs_producing(target).next().copied().unwrap();
    run(&mut s, &format!("pick 1 {}", p.display_name(hint.first)));
    run(&mut s, &format!("pick 2 {}", p.display_name(hint.second)));
    run(&mut s, "check");
    let before = frame(&s);
    let out = run(&mut s, "wait 18446744073709551615");
    assert!(out[0].starts_with("next round"), "{out:?}");
    assert!(s.game().pending().is_none());
    // 2000ms advance delay fits in one step
    assert_eq!(frame(&s), before + 1);
}
