use arena_brawler::config::*;
use arena_brawler::entities::{Archetype, Stage};

#[test]
fn built_in_tunings_are_valid() {
    assert_eq!(Tuning::default().validate(), Ok(()));
    assert_eq!(Tuning::arena().validate(), Ok(()));
    assert_eq!(Tuning::for_variant(Variant::Platformer), Tuning::default());
    assert_eq!(Tuning::for_variant(Variant::Arena), Tuning::arena());
}

#[test]
fn archetypes_keep_their_relative_roles() {
    let t = EnemyTable::default();
    let (light, ranged, heavy) = (&t.light_melee, &t.ranged, &t.heavy_melee);
    assert!(heavy.health > light.health && light.health > ranged.health);
    assert!(heavy.damage > light.damage);
    assert!(heavy.speed < light.speed);
    assert!(ranged.flies && !light.flies && !heavy.flies);
    assert!(ranged.attack_range > light.attack_range);
    assert_eq!(t.get(Archetype::HeavyMelee), heavy);
}

#[test]
fn stages_have_what_the_simulation_needs() {
    for variant in [Variant::Platformer, Variant::Arena] {
        let stage = Stage::for_variant(variant);
        assert!(!stage.platforms.is_empty());
        assert!(!stage.spawn_anchors.is_empty());
        assert!(stage.bounds.contains_point(stage.player_spawn));
    }
}

#[test]
fn empty_document_gives_defaults() {
    assert_eq!(tuning_from_str("()").ok(), Some(Tuning::default()));
}

#[test]
fn partial_document_overrides_only_named_fields() {
    let t = tuning_from_str("(player: (max_health: 500.0), ray: (dps: 10.0))").expect("valid tuning");
    assert_eq!(t.player.max_health, 500.0);
    assert_eq!(t.ray.dps, 10.0);
    assert_eq!(t.player.max_energy, 300.0);
    assert_eq!(t.melee, MeleeTuning::default());
}

#[test]
fn wave_table_parses_archetype_names() {
    let t = tuning_from_str("(waves: (table: [[(LightMelee, 2), (Ranged, 1)]]))").expect("valid tuning");
    assert_eq!(t.waves.table, vec![vec![(Archetype::LightMelee, 2), (Archetype::Ranged, 1)]]);
    assert_eq!(t.waves.interval, WaveTuning::default().interval);
}

#[test]
fn malformed_document_is_a_parse_error() {
    assert!(matches!(tuning_from_str("(player: "), Err(ConfigError::Parse(_))));
    assert!(matches!(tuning_from_str("(ray: (dps: \"fast\"))"), Err(ConfigError::Parse(_))));
}

#[test]
fn out_of_range_values_are_rejected() {
    let err = tuning_from_str("(hazard: (spark_chance: 1.5))");
    assert!(matches!(err, Err(ConfigError::Invalid(_))));

    let err = tuning_from_str("(waves: (table: [[(Ranged, 0)]]))");
    assert!(matches!(err, Err(ConfigError::Invalid(_))));

    let mut t = Tuning::default();
    t.ray.drain = -1.0;
    assert!(t.validate().unwrap_err().contains("ray.drain"));

    let mut t = Tuning::default();
    t.waves.initial_cooldown = (2.0, 1.0);
    assert!(t.validate().is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("arena_brawler_no_such_tuning.ron");
    assert!(matches!(load_tuning(&path), Err(ConfigError::Io(_))));
}

#[test]
fn tuning_loads_from_file() {
    let path = std::env::temp_dir().join(format!("arena_brawler_tuning_{}.ron", std::process::id()));
    std::fs::write(&path, "(camera: (follow: 0.5))").expect("write temp file");
    let loaded = load_tuning(&path);
    let _ = std::fs::remove_file(&path);

    let t = loaded.expect("file parses");
    assert_eq!(t.camera.follow, 0.5);
    assert_eq!(t.camera.viewport, (1280.0, 720.0));
}

#[test]
fn arena_tuning_survives_ron() {
    let text = ron::to_string(&Tuning::arena()).expect("serialize");
    assert_eq!(tuning_from_str(&text).ok(), Some(Tuning::arena()));
}

#[test]
fn error_messages_name_their_kind() {
    let invalid = ConfigError::Invalid("player.max_health must be positive".to_string());
    assert_eq!(invalid.to_string(), "Invalid tuning: player.max_health must be positive");

    let parse = tuning_from_str("(").unwrap_err();
    assert!(parse.to_string().starts_with("Parse error: "));
}
