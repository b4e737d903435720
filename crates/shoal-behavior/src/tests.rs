//! Unit tests for behaviour settings and the registry.

use shoal_core::{TypeId, TypeMask};

use crate::{BehaviourRegistry, BehaviourSettings, RegistryBuilder, Relation};

fn plain() -> BehaviourSettings {
    BehaviourSettings::default()
}

#[test]
fn builder_registers_and_indexes_types() {
    let mut b = RegistryBuilder::new();
    let prey = b.add_type(plain());
    let predator = b.add_type(plain());
    assert_eq!(prey, TypeId(0));
    assert_eq!(predator, TypeId(1));

    let reg = b.build(1.0).unwrap();
    assert_eq!(reg.len(), 2);
}

#[test]
fn relations_are_mirrored() {
    let mut b = RegistryBuilder::new();
    let prey = b.add_type(plain());
    let predator = b.add_type(plain());
    let drifter = b.add_type(plain());
    b.relate(prey, prey, Relation::Friendly);
    b.relate(prey, predator, Relation::Avoid);
    b.relate(prey, drifter, Relation::Neutral);
    let reg = b.build(1.0).unwrap();

    assert_eq!(reg.relation(prey, prey), Some(Relation::Friendly));
    assert_eq!(reg.relation(prey, predator), Some(Relation::Avoid));
    assert_eq!(reg.relation(predator, prey), Some(Relation::Avoid));
    assert_eq!(reg.relation(prey, drifter), Some(Relation::Neutral));
    assert_eq!(reg.relation(drifter, prey), Some(Relation::Neutral));
    // No declared relation → unclassified.
    assert_eq!(reg.relation(predator, drifter), None);
}

#[test]
fn classification_order_friendly_before_avoid() {
    // A type both grouped and avoided classifies as friendly (first match).
    let mut a = plain();
    let mut b = plain();
    a.group_mask = TypeMask::only(TypeId(1));
    a.avoid_mask = TypeMask::only(TypeId(1));
    b.group_mask = TypeMask::only(TypeId(0));
    b.avoid_mask = TypeMask::only(TypeId(0));
    let reg = BehaviourRegistry::from_settings(vec![a, b], 1.0).unwrap();
    assert_eq!(reg.relation(TypeId(0), TypeId(1)), Some(Relation::Friendly));
}

#[test]
fn asymmetric_masks_rejected() {
    let mut a = plain();
    let b = plain();
    a.avoid_mask = TypeMask::only(TypeId(1)); // b does not avoid a back
    let result = BehaviourRegistry::from_settings(vec![a, b], 1.0);
    assert!(result.is_err());
}

#[test]
fn too_many_types_rejected() {
    let settings = vec![plain(); TypeMask::MAX_TYPES + 1];
    assert!(BehaviourRegistry::from_settings(settings, 1.0).is_err());
}

#[test]
fn empty_registry_rejected() {
    assert!(BehaviourRegistry::from_settings(vec![], 1.0).is_err());
}

#[test]
fn relation_to_unregistered_type_errors() {
    let mut b = RegistryBuilder::new();
    let t = b.add_type(plain());
    b.relate(t, TypeId(5), Relation::Friendly);
    assert!(b.build(1.0).is_err());
}

#[test]
fn cell_rings_precomputed_per_type() {
    let mut near = plain();
    near.neighbour_radius = 2.0;
    let mut far = plain();
    far.neighbour_radius = 7.5;
    let reg = BehaviourRegistry::from_settings(vec![near, far], 2.5).unwrap();
    assert_eq!(reg.cell_rings(TypeId(0)), 1); // ceil(2.0 / 2.5)
    assert_eq!(reg.cell_rings(TypeId(1)), 3); // ceil(7.5 / 2.5)
}

#[test]
fn sanitize_clamps_degenerate_radii() {
    let mut s = plain();
    s.neighbour_radius = -1.0;
    s.separation_radius = 0.0;
    s.depth_band = (0.9, 0.2);
    let reg = BehaviourRegistry::from_settings(vec![s], 1.0).unwrap();
    let s = reg.get(TypeId(0));
    assert!(s.neighbour_radius > 0.0);
    assert!(s.separation_radius > 0.0);
    assert!(s.depth_band.0 <= s.depth_band.1);
}

#[test]
fn is_valid_type_bounds() {
    let reg = BehaviourRegistry::from_settings(vec![plain(); 2], 1.0).unwrap();
    assert!(reg.is_valid_type(TypeId(1)));
    assert!(!reg.is_valid_type(TypeId(2)));
}
