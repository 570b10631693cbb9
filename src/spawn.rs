//! Wave spawn director.

use rand::Rng;

use crate::config::{EnemyTable, WaveTuning};
use crate::entities::{Archetype, Enemy, SpawnDirector, Stage};
use crate::geometry::Vec2;

impl SpawnDirector {
    pub fn new(first_delay: f32) -> Self {
        SpawnDirector {
            timer: first_delay,
            next_wave: 0,
            exhausted: false,
        }
    }

    /// Count down and, on expiry, instantiate the next wave.  Returns the new
    /// enemies (empty on most frames, and always empty once the table has
    /// run out).
    pub fn update(
        &mut self,
        dt: f32,
        waves: &WaveTuning,
        enemies: &EnemyTable,
        stage: &Stage,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        if self.exhausted {
            return Vec::new();
        }
        self.timer -= dt;
        if self.timer > 0.0 {
            return Vec::new();
        }

        let Some(wave) = waves.table.get(self.next_wave) else {
            self.exhausted = true;
            return Vec::new();
        };
        self.next_wave += 1;
        self.timer = waves.interval;
        if self.next_wave >= waves.table.len() {
            self.exhausted = true;
            log::info!("spawn director: wave table exhausted");
        }

        if stage.spawn_anchors.is_empty() {
            log::warn!("spawn director: stage has no spawn anchors, wave {} skipped", self.next_wave);
            return Vec::new();
        }

        let mut spawned = Vec::new();
        for &(archetype, count) in wave {
            for _ in 0..count {
                spawned.push(spawn_one(archetype, waves, enemies, stage, rng));
            }
        }
        log::debug!("spawn director: wave {} spawned {} enemies", self.next_wave, spawned.len());
        spawned
    }
}

fn spawn_one(
    archetype: Archetype,
    waves: &WaveTuning,
    enemies: &EnemyTable,
    stage: &Stage,
    rng: &mut impl Rng,
) -> Enemy {
    let stats = enemies.get(archetype);
    let anchor = stage.spawn_anchors[rng.gen_range(0..stage.spawn_anchors.len())];
    let jitter = if waves.jitter > 0.0 {
        rng.gen_range(-waves.jitter..=waves.jitter)
    } else {
        0.0
    };
    let pos = anchor + Vec2::new(jitter, -stats.spawn_lift);
    let (lo, hi) = waves.initial_cooldown;
    let cooldown = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    Enemy::new(archetype, pos, stats, cooldown)
}
