use glam::{UVec3, Vec3};
use shoal_agent::AgentStoreBuilder;
use shoal_behavior::{BehaviourSettings, RegistryBuilder, Relation, SamplingCaps};
use shoal_core::AgentId;
use shoal_field::Environment;
use shoal_spatial::{AgentGridIndex, GridSpec};

use crate::NeighbourAggregate;
use crate::aggregate::aggregate_neighbours;
use crate::compose::{FieldInputs, Steering, compose_steering};

const CELL: f32 = 8.0;

fn grid() -> GridSpec {
    GridSpec::new(Vec3::splat(-16.0), CELL, UVec3::splat(4)).unwrap()
}

fn index_for(spec: &GridSpec, positions: &[Vec3]) -> AgentGridIndex {
    let mut index = AgentGridIndex::new();
    index.rebuild(spec, positions, |_| 0.0);
    index
}

mod aggregate {
    use super::*;

    #[test]
    fn no_neighbours_yields_zero_aggregate() {
        let spec = grid();
        let registry = {
            let mut b = RegistryBuilder::new();
            b.add_type(BehaviourSettings::default());
            b.build(CELL).unwrap()
        };
        let (store, _) = AgentStoreBuilder::new(1, 7)
            .positions(vec![Vec3::ZERO])
            .build()
            .unwrap();
        let index = index_for(&spec, &store.positions);

        let agg = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        assert_eq!(agg, NeighbourAggregate::default());
    }

    #[test]
    fn hard_separation_quadratic_magnitude() {
        // body 1.0 each, contact range 2.0, dist 1.5: penetration fraction
        // (2.0 - 1.5) / 1.0 = 0.5, magnitude 1 + 0.25.
        let spec = grid();
        let settings = BehaviourSettings {
            body_radius: 1.0,
            separation_radius: 0.5,
            ..BehaviourSettings::default()
        };
        let registry = {
            let mut b = RegistryBuilder::new();
            b.add_type(settings);
            b.build(CELL).unwrap()
        };
        let positions = vec![Vec3::ZERO, Vec3::new(1.5, 0.0, 0.0)];
        let (store, _) = AgentStoreBuilder::new(2, 7)
            .positions(positions)
            .build()
            .unwrap();
        let index = index_for(&spec, &store.positions);

        let agg = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        assert_eq!(agg.separation_samples, 1);
        let expected = Vec3::new(-1.25, 0.0, 0.0);
        assert!((agg.separation_sum - expected).length() < 1e-6);

        // The pair is symmetric: the other side pushes the opposite way.
        let other = aggregate_neighbours(AgentId(1), &store, &registry, &spec, &index);
        assert!((other.separation_sum + agg.separation_sum).length() < 1e-6);
    }

    #[test]
    fn leadership_ties_share_the_lead() {
        // Leaderships [5, 5, 4] at proximity 0.5 each: the two fives form
        // the leader set, the four is excluded.
        let observer = BehaviourSettings {
            neighbour_radius: 10.0,
            ..BehaviourSettings::default()
        };
        let lead_five = BehaviourSettings {
            leadership_weight: 5.0,
            ..observer.clone()
        };
        let lead_four = BehaviourSettings {
            leadership_weight: 4.0,
            ..observer.clone()
        };

        let mut b = RegistryBuilder::new();
        let t0 = b.add_type(observer);
        let t5 = b.add_type(lead_five);
        let t4 = b.add_type(lead_four);
        b.relate(t0, t5, Relation::Friendly);
        b.relate(t0, t4, Relation::Friendly);
        let registry = b.build(CELL).unwrap();

        let positions = vec![
            Vec3::ZERO,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
        ];
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);
        let v3 = Vec3::new(0.0, 0.0, 1.0);
        let (store, _) = AgentStoreBuilder::new(4, 7)
            .positions(positions)
            .velocities(vec![Vec3::ZERO, v1, v2, v3])
            .behaviours(vec![t0, t5, t5, t4])
            .build()
            .unwrap();
        let spec = grid();
        let index = index_for(&spec, &store.positions);

        let agg = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        assert_eq!(agg.leader_count, 2);
        assert_eq!(agg.max_leadership, 5.0);
        let expected = (v1 + v2) * 0.5;
        assert!((agg.alignment_sum - expected).length() < 1e-6);
        assert!((agg.alignment_weight_sum - 1.0).abs() < 1e-6);
        // Cohesion still folds in all three friendlies.
        assert_eq!(agg.friendly_count, 3);
    }

    #[test]
    fn friendly_pair_is_symmetric_without_caps() {
        let settings = BehaviourSettings {
            neighbour_radius: 10.0,
            ..BehaviourSettings::default()
        };
        let mut b = RegistryBuilder::new();
        let t = b.add_type(settings);
        b.relate(t, t, Relation::Friendly);
        let registry = b.build(CELL).unwrap();

        let va = Vec3::new(1.0, 0.0, 0.0);
        let vb = Vec3::new(0.0, 2.0, 0.0);
        let (store, _) = AgentStoreBuilder::new(2, 7)
            .positions(vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)])
            .velocities(vec![va, vb])
            .build()
            .unwrap();
        let spec = grid();
        let index = index_for(&spec, &store.positions);

        // Each side folds in the other's velocity at the same proximity.
        let agg_a = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        let agg_b = aggregate_neighbours(AgentId(1), &store, &registry, &spec, &index);
        assert!((agg_a.alignment_sum - vb * 0.5).length() < 1e-6);
        assert!((agg_b.alignment_sum - va * 0.5).length() < 1e-6);
        assert!((agg_a.alignment_weight_sum - agg_b.alignment_weight_sum).abs() < 1e-6);
    }

    #[test]
    fn avoid_scales_with_weight_advantage() {
        let prey = BehaviourSettings {
            neighbour_radius: 10.0,
            avoidance_weight: 1.0,
            avoid_response: 2.0,
            ..BehaviourSettings::default()
        };
        let predator = BehaviourSettings {
            neighbour_radius: 10.0,
            avoidance_weight: 4.0,
            ..BehaviourSettings::default()
        };
        let mut b = RegistryBuilder::new();
        let tp = b.add_type(prey);
        let td = b.add_type(predator);
        b.relate(tp, td, Relation::Avoid);
        let registry = b.build(CELL).unwrap();

        let (store, _) = AgentStoreBuilder::new(2, 7)
            .positions(vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)])
            .behaviours(vec![tp, td])
            .build()
            .unwrap();
        let spec = grid();
        let index = index_for(&spec, &store.positions);

        // proximity 0.5, advantage (4-1)/4 = 0.75, response 2:
        // intensity = sat(0.5 * 0.75 * 2) = 0.75.
        let agg = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        assert!((agg.avoid_danger - 0.75).abs() < 1e-6);
        let expected = Vec3::new(-0.75, 0.0, 0.0);
        assert!((agg.avoid_separation_sum - expected).length() < 1e-6);

        // The predator outranks the prey and does not flee it.
        let predator_agg = aggregate_neighbours(AgentId(1), &store, &registry, &spec, &index);
        assert_eq!(predator_agg.avoid_danger, 0.0);
    }

    #[test]
    fn neighbour_check_cap_truncates_the_scan() {
        let settings = BehaviourSettings {
            neighbour_radius: 10.0,
            caps: SamplingCaps {
                max_neighbour_checks: 1,
                ..SamplingCaps::default()
            },
            ..BehaviourSettings::default()
        };
        let mut b = RegistryBuilder::new();
        let t = b.add_type(settings);
        b.relate(t, t, Relation::Friendly);
        let registry = b.build(CELL).unwrap();

        let positions = vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
        ];
        let (store, _) = AgentStoreBuilder::new(3, 7)
            .positions(positions)
            .build()
            .unwrap();
        let spec = grid();
        let index = index_for(&spec, &store.positions);

        let agg = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        assert_eq!(agg.friendly_count, 1);
    }

    #[test]
    fn schooling_dead_zone_is_force_free() {
        // spacing_factor 2 on body 0.5 each: target 2.0, dead zone ±0.3.
        let settings = BehaviourSettings {
            neighbour_radius: 10.0,
            body_radius: 0.5,
            separation_radius: 0.01,
            schooling: shoal_behavior::SchoolingSettings {
                weight: 1.0,
                ..shoal_behavior::SchoolingSettings::default()
            },
            ..BehaviourSettings::default()
        };
        let mut b = RegistryBuilder::new();
        let t = b.add_type(settings);
        b.relate(t, t, Relation::Friendly);
        let registry = b.build(CELL).unwrap();

        let (store, _) = AgentStoreBuilder::new(2, 7)
            .positions(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)])
            .build()
            .unwrap();
        let spec = grid();
        let index = index_for(&spec, &store.positions);

        let agg = aggregate_neighbours(AgentId(0), &store, &registry, &spec, &index);
        assert_eq!(agg.schooling_sum, Vec3::ZERO);
    }
}

mod composition {
    use super::*;

    fn env() -> Environment {
        Environment::bounded_box(Vec3::ZERO, Vec3::splat(100.0))
    }

    fn settle(
        settings: &BehaviourSettings,
        agg: &NeighbourAggregate,
        inputs: &FieldInputs,
        vel: Vec3,
    ) -> Steering {
        compose_steering(
            AgentId(0),
            settings,
            agg,
            inputs,
            &env(),
            Vec3::ZERO,
            vel,
            1.0,
        )
    }

    #[test]
    fn no_inputs_means_no_motion() {
        let settings = BehaviourSettings::default();
        let s = settle(
            &settings,
            &NeighbourAggregate::default(),
            &FieldInputs::default(),
            Vec3::ZERO,
        );
        assert_eq!(s.velocity, Vec3::ZERO);
        assert_eq!(s.position, Vec3::ZERO);
    }

    #[test]
    fn depth_wins_over_opposing_attractor() {
        // Agent below its band while an attractor pulls further down.
        let mut settings = BehaviourSettings {
            depth_weight: 1.0,
            depth_band: (0.6, 1.0),
            depth_wins_over_attractor: true,
            ..BehaviourSettings::default()
        };
        let inputs = FieldInputs {
            attraction: Some((Vec3::NEG_Y, 1.0)),
            depth: 0.2,
            ..FieldInputs::default()
        };
        let agg = NeighbourAggregate::default();

        let up = settle(&settings, &agg, &inputs, Vec3::ZERO);
        assert!(up.velocity.y > 0.0);

        settings.depth_wins_over_attractor = false;
        let down = settle(&settings, &agg, &inputs, Vec3::ZERO);
        assert!(down.velocity.y < 0.0);
    }

    #[test]
    fn aligned_depth_and_attractor_sum() {
        // Both pull upward: no arbitration, contributions add.
        let settings = BehaviourSettings {
            depth_weight: 1.0,
            depth_band: (0.6, 1.0),
            depth_wins_over_attractor: true,
            ..BehaviourSettings::default()
        };
        let inputs = FieldInputs {
            attraction: Some((Vec3::Y, 0.5)),
            depth: 0.2,
            ..FieldInputs::default()
        };
        let s = settle(&settings, &NeighbourAggregate::default(), &inputs, Vec3::ZERO);
        // depth push 0.4 + attractor 0.5.
        assert!((s.velocity.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn velocity_saturates_at_max_speed() {
        let settings = BehaviourSettings::default();
        let inputs = FieldInputs {
            pattern: Vec3::new(1000.0, 0.0, 0.0),
            ..FieldInputs::default()
        };
        let s = settle(&settings, &NeighbourAggregate::default(), &inputs, Vec3::ZERO);
        assert!(s.velocity.length() <= settings.max_speed + 1e-4);
    }

    #[test]
    fn position_stays_inside_bounds() {
        let settings = BehaviourSettings {
            max_speed: 1000.0,
            max_acceleration: 1000.0,
            ..BehaviourSettings::default()
        };
        let small = Environment::bounded_box(Vec3::ZERO, Vec3::splat(2.0));
        let s = compose_steering(
            AgentId(0),
            &settings,
            &NeighbourAggregate::default(),
            &FieldInputs {
                pattern: Vec3::new(500.0, 0.0, 0.0),
                ..FieldInputs::default()
            },
            &small,
            Vec3::ZERO,
            Vec3::ZERO,
            1.0,
        );
        assert!(s.position.x <= 2.0);
    }

    #[test]
    fn split_fans_even_and_odd_agents_apart() {
        let settings = BehaviourSettings::default();
        let agg = NeighbourAggregate {
            avoid_danger: 1.0,
            ..NeighbourAggregate::default()
        };
        let vel = Vec3::new(0.0, 0.0, 1.0);
        let even = compose_steering(
            AgentId(0),
            &settings,
            &agg,
            &FieldInputs::default(),
            &env(),
            Vec3::ZERO,
            vel,
            1.0,
        );
        let odd = compose_steering(
            AgentId(1),
            &settings,
            &agg,
            &FieldInputs::default(),
            &env(),
            Vec3::ZERO,
            vel,
            1.0,
        );
        assert!(even.velocity.x != 0.0);
        assert!((even.velocity.x + odd.velocity.x).abs() < 1e-6);
        assert!(even.velocity.x * odd.velocity.x < 0.0);
    }

    #[test]
    fn panic_boost_raises_the_speed_ceiling() {
        let settings = BehaviourSettings::default();
        let calm = NeighbourAggregate::default();
        let panicked = NeighbourAggregate {
            avoid_danger: 1.0,
            avoid_separation_sum: Vec3::new(1000.0, 0.0, 0.0),
            ..NeighbourAggregate::default()
        };
        let inputs = FieldInputs {
            pattern: Vec3::new(1000.0, 0.0, 0.0),
            ..FieldInputs::default()
        };
        let slow = settle(&settings, &calm, &inputs, Vec3::ZERO);
        let fast = settle(&settings, &panicked, &inputs, Vec3::ZERO);
        assert!(fast.velocity.length() > slow.velocity.length());
        let boosted_cap = settings.max_speed * settings.split.boost;
        assert!(fast.velocity.length() <= boosted_cap + 1e-3);
    }

    #[test]
    fn depth_correction_is_zero_inside_the_band() {
        let settings = BehaviourSettings {
            depth_weight: 1.0,
            depth_band: (0.3, 0.7),
            ..BehaviourSettings::default()
        };
        let inputs = FieldInputs {
            depth: 0.5,
            ..FieldInputs::default()
        };
        let s = settle(&settings, &NeighbourAggregate::default(), &inputs, Vec3::ZERO);
        assert_eq!(s.velocity, Vec3::ZERO);
    }
}
