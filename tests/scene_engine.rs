use std::{
    path::Path,
    thread,
    time::{Duration, Instant},
};

use dmxctl::{
    engine::{Engine, EngineConfig, WIRE_FRAME_SIZE},
    ChildEngine, CommandLog, Controller, DmxCtl, EngineProgram, Fraction, Target, Universe,
};
use example_files::{load_rig, EXAMPLES_DIR, RIG_PATH};
use pretty_assertions::assert_eq;

fn scene(name: &str) -> String {
    EXAMPLES_DIR
        .join("scenes")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Feed everything the controller sent so far into the engine.
fn forward(ctl: &mut DmxCtl<CommandLog>, engine: &mut Engine<Vec<u8>>, now: Instant) {
    for line in ctl.sink_mut().take() {
        engine.step(Some(&line), now).unwrap();
    }
}

fn live_universe(engine: &Engine<Vec<u8>>) -> &[u8] {
    &engine.slots()[1..]
}

#[test]
fn loaded_scene_reaches_the_engine() -> anyhow::Result<()> {
    let mut ctl = DmxCtl::new(load_rig(), CommandLog::default());
    let mut engine = Engine::new(Vec::new(), EngineConfig::default());
    let t0 = Instant::now();

    ctl.execute("load", &[scene("warm.yaml")])?;
    forward(&mut ctl, &mut engine, t0);
    assert_eq!(live_universe(&engine), ctl.universe().slots().as_slice());
    assert_eq!(engine.slots()[0], 0, "start code");

    // the device received the same frame, start code first
    let written = engine.device();
    assert_eq!(written.len() % WIRE_FRAME_SIZE, 0);
    assert_eq!(&written[written.len() - WIRE_FRAME_SIZE..], engine.slots().as_slice());
    Ok(())
}

#[test]
fn load_and_fade_brings_masters_up() -> anyhow::Result<()> {
    let mut ctl = DmxCtl::new(load_rig(), CommandLog::default());
    let mut engine = Engine::new(Vec::new(), EngineConfig::default());
    let t0 = Instant::now();

    ctl.execute("loadAndFade", &[scene("warm.yaml"), "1s".to_owned()])?;
    forward(&mut ctl, &mut engine, t0);

    // the frame went out dark, the fades are still running
    let masters = ctl.universe().addresses_for(Target::Master, None)?;
    assert_eq!(masters.len(), 3);
    for &addr in &masters {
        assert_eq!(engine.slot(addr), 0);
    }
    assert_eq!(engine.fader_count(), masters.len());

    engine.step(None, t0 + Duration::from_millis(500))?;
    for &addr in &masters {
        let level = engine.slot(addr);
        assert!(0 < level && level < 0xFF, "{level}");
    }

    engine.step(None, t0 + Duration::from_millis(1000))?;
    assert_eq!(engine.fader_count(), 0);
    assert_eq!(live_universe(&engine), ctl.universe().slots().as_slice());
    assert_eq!(ctl.universe().min_level(Target::Master), Some(1.0));
    Ok(())
}

#[test]
fn fade_inst_to_only_touches_matching_instruments() -> anyhow::Result<()> {
    let mut ctl = DmxCtl::new(load_rig(), CommandLog::default());
    let mut engine = Engine::new(Vec::new(), EngineConfig::default());
    let t0 = Instant::now();

    ctl.execute("loadBright", &[scene("warm.yaml")])?;
    ctl.execute("fadeInstTo", &["Par".to_owned(), "0".to_owned(), "200ms".to_owned()])?;
    forward(&mut ctl, &mut engine, t0);
    engine.step(None, t0 + Duration::from_millis(200))?;

    let spot = ctl.universe().addresses_for(Target::Master, Some("Spot"))?;
    let pars = ctl.universe().addresses_for(Target::Master, Some("Par"))?;
    assert_eq!(spot.iter().map(|&a| engine.slot(a)).collect::<Vec<_>>(), [0xFF]);
    assert_eq!(pars.iter().map(|&a| engine.slot(a)).collect::<Vec<_>>(), [0, 0]);

    // unmatched prefixes fade nothing
    ctl.execute("fadeInstTo", &["Moving".to_owned(), "1".to_owned(), "1s".to_owned()])?;
    assert!(ctl.sink().lines().is_empty());
    Ok(())
}

#[test]
fn load_dark_keeps_the_scene_but_not_the_masters() -> anyhow::Result<()> {
    let mut ctl = DmxCtl::new(load_rig(), CommandLog::default());
    let mut engine = Engine::new(Vec::new(), EngineConfig::default());
    let t0 = Instant::now();

    ctl.execute("loadDark", &[scene("warm.yaml")])?;
    let lines = ctl.sink().lines().to_vec();
    assert_eq!(lines.len(), 1);
    assert!(lines.iter().all(|l| l.starts_with('#')), "{lines:?}");
    forward(&mut ctl, &mut engine, t0);

    for addr in ctl.universe().addresses_for(Target::Master, None)? {
        assert_eq!(engine.slot(addr), 0, "master at {addr}");
    }
    let slot = |a: u16| -> anyhow::Result<u8> { Ok(engine.slot(a.try_into()?)) };
    // red and green of both pars, high byte of the spot's pan
    assert_eq!(slot(11)?, 0xFF);
    assert_eq!(slot(12)?, 0x7F);
    assert_eq!(slot(15)?, 0xFF);
    assert_eq!(slot(16)?, 0x7F);
    assert_eq!(slot(3)?, 0x08);
    assert_eq!(live_universe(&engine), ctl.universe().slots().as_slice());
    assert_eq!(engine.fader_count(), 0);
    Ok(())
}

#[test]
fn invalid_scenes_are_rejected_before_anything_is_sent() {
    let mut ctl = DmxCtl::new(load_rig(), CommandLog::default());
    ctl.universe_mut().set_levels(Target::Color, Fraction::FULL);
    let before: Universe = ctl.universe().clone();

    for (file, diagnostic) in [
        (
            "unknown_instrument.yaml",
            "Invalid scene file: `Moving` does not name a known instrument.",
        ),
        (
            "missing_channel.yaml",
            "Invalid scene file: `Par1` does not have a channel `pan`",
        ),
    ] {
        let args = [scene(file)];
        assert_eq!(ctl.diagnostic("loadBright", &args), diagnostic);
        assert!(ctl.execute("loadBright", &args).is_err());
    }
    assert!(!ctl.diagnostic("load", &[scene("nope.yaml")]).is_empty());

    assert_eq!(ctl.universe(), &before);
    assert!(ctl.sink().lines().is_empty());
}

fn engine_program() -> EngineProgram {
    EngineProgram::new(env!("CARGO_BIN_EXE_dmxctl-engine"))
}

fn wait_for_exit(ctl: &DmxCtl<ChildEngine>) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if !ctl.is_alive() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

#[cfg(target_os = "linux")]
#[test]
fn drives_a_real_engine_process() -> anyhow::Result<()> {
    let universe = Universe::from_path(&*RIG_PATH)?;
    let mut ctl = DmxCtl::spawn(&engine_program(), Path::new("/dev/null"), universe)?;

    ctl.execute("load", &[scene("gobo_star.yaml")])?;
    ctl.execute("fadeTo", &["0.5".to_owned(), "100ms".to_owned()])?;
    thread::sleep(Duration::from_millis(200));

    assert!(ctl.is_alive());
    assert_eq!(ctl.state(), "good");
    Ok(())
}

#[test]
fn engine_exits_on_a_device_that_is_not_a_character_device() -> anyhow::Result<()> {
    let ctl = DmxCtl::spawn(&engine_program(), RIG_PATH.as_path(), load_rig())?;
    assert!(wait_for_exit(&ctl), "engine kept running");
    assert_eq!(ctl.state(), "engine exited");
    Ok(())
}
