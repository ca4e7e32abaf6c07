use precland::core_params::precland::{
    KEY_ACCEPT_RADIUS, KEY_MAX_SEARCHES, KEY_MODE, KEY_OFFSET_X, KEY_SAFETY_LAT,
    KEY_TARGET_TIMEOUT,
};
use precland::core_params::{ParamDescriptor, ParamType, PRECLAND_GROUP, PRECLAND_PARAMS};
use precland::parameters::{build_registry, persist};
use precland::{FallbackMode, ParamValue, ParameterError, PrecisionLandParams, Provenance};

/// Value three quarters of the way from `min` to `max`
fn interior_value(descriptor: &ParamDescriptor) -> ParamValue {
    match (descriptor.min, descriptor.max) {
        (ParamValue::Float(min), ParamValue::Float(max)) => {
            ParamValue::Float(min + (max - min) * 0.75)
        }
        (ParamValue::Int32(min), ParamValue::Int32(max)) => {
            ParamValue::Int32(((i64::from(min) + i64::from(max) * 3) / 4) as i32)
        }
        _ => unreachable!("bounds share the declared type"),
    }
}

#[test]
fn every_default_lies_within_bounds() {
    let registry = build_registry().unwrap();

    for entry in registry.enumerate(None) {
        let d = entry.descriptor;
        assert_eq!(entry.value, d.default, "{}", d.key);
        assert_eq!(entry.provenance, Provenance::Default);
        assert_eq!(d.default.param_type(), d.param_type);
        assert!(d.check(d.default).is_ok(), "{}", d.key);
        assert!(d.check(d.min).is_ok() && d.check(d.max).is_ok(), "{}", d.key);
    }
}

#[test]
fn set_in_range_then_get_returns_value() {
    let registry = build_registry().unwrap();

    for descriptor in PRECLAND_PARAMS.iter() {
        let value = interior_value(descriptor);
        registry.set(descriptor.key, value).unwrap();
        assert_eq!(registry.get(descriptor.key), Ok(value));
        assert_eq!(registry.provenance(descriptor.key), Ok(Provenance::Overridden));
    }
}

#[test]
fn set_out_of_range_leaves_value_unchanged() {
    let registry = build_registry().unwrap();

    for descriptor in PRECLAND_PARAMS.iter() {
        let above = match descriptor.max {
            ParamValue::Float(max) => ParamValue::Float(max + 1.0),
            ParamValue::Int32(max) => ParamValue::Int32(max + 1),
        };
        let below = match descriptor.min {
            ParamValue::Float(min) => ParamValue::Float(min - 1.0),
            ParamValue::Int32(min) => ParamValue::Int32(min - 1),
        };

        for value in [above, below] {
            assert_eq!(
                registry.set(descriptor.key, value),
                Err(ParameterError::OutOfRange {
                    key: descriptor.key
                })
            );
            assert_eq!(registry.get(descriptor.key), Ok(descriptor.default));
        }
    }
    assert!(!registry.is_dirty());
}

#[test]
fn reset_restores_default() {
    let registry = build_registry().unwrap();
    registry.set(KEY_TARGET_TIMEOUT, ParamValue::Float(12.5)).unwrap();
    registry.set(KEY_SAFETY_LAT, ParamValue::Int32(473_977_420)).unwrap();

    registry.reset(KEY_TARGET_TIMEOUT).unwrap();
    assert_eq!(registry.get(KEY_TARGET_TIMEOUT), Ok(ParamValue::Float(5.0)));
    assert_eq!(registry.provenance(KEY_TARGET_TIMEOUT), Ok(Provenance::Default));
    assert_eq!(registry.provenance(KEY_SAFETY_LAT), Ok(Provenance::Overridden));

    registry.reset_all();
    assert_eq!(registry.get(KEY_SAFETY_LAT), Ok(ParamValue::Int32(0)));
    assert_eq!(registry.overrides().count(), 0);
}

#[test]
fn enumerate_yields_each_key_once_in_order() {
    let registry = build_registry().unwrap();
    let keys: Vec<&str> = registry.enumerate(None).map(|e| e.descriptor.key).collect();
    let declared: Vec<&str> = PRECLAND_PARAMS.iter().map(|d| d.key).collect();
    assert_eq!(keys, declared);

    let grouped = registry.enumerate(Some(PRECLAND_GROUP)).count();
    assert_eq!(grouped, keys.len());
    assert_eq!(registry.enumerate(Some("Battery")).count(), 0);
}

#[test]
fn snapshot_round_trip_reproduces_overrides() {
    let source = build_registry().unwrap();
    source.set(KEY_ACCEPT_RADIUS, ParamValue::Float(0.35)).unwrap();
    source.set(KEY_OFFSET_X, ParamValue::Float(2.0)).unwrap();
    source.set(KEY_MODE, ParamValue::Int32(1)).unwrap();

    let mut image = vec![0u8; precland::core_params::MAX_SNAPSHOT_SIZE];
    let len = persist::save(&source, 42, &mut image).unwrap();

    let target = build_registry().unwrap();
    let report = persist::restore(&target, &image[..len]);
    assert_eq!(report.applied, 3);
    assert_eq!(report.skipped, 0);

    let source_entries: Vec<_> = source.enumerate(None).collect();
    let target_entries: Vec<_> = target.enumerate(None).collect();
    assert_eq!(source_entries, target_entries);

    let params = PrecisionLandParams::from_registry(&target);
    assert_eq!(params.mode, FallbackMode::Offset);
    assert_eq!(params.landing_offset(), (2.0, 0.0));
}

#[test]
fn max_search_attempts_scenario() {
    let registry = build_registry().unwrap();
    assert_eq!(registry.get_i32(KEY_MAX_SEARCHES), Ok(3));

    registry.set(KEY_MAX_SEARCHES, ParamValue::Int32(5)).unwrap();
    assert_eq!(registry.get_i32(KEY_MAX_SEARCHES), Ok(5));

    assert_eq!(
        registry.set(KEY_MAX_SEARCHES, ParamValue::Int32(150)),
        Err(ParameterError::OutOfRange {
            key: KEY_MAX_SEARCHES
        })
    );
    assert_eq!(registry.get_i32(KEY_MAX_SEARCHES), Ok(5));
}

#[test]
fn fallback_mode_provenance_scenario() {
    let registry = build_registry().unwrap();
    assert_eq!(registry.get_i32(KEY_MODE), Ok(0));
    assert_eq!(registry.provenance(KEY_MODE), Ok(Provenance::Default));

    registry.set(KEY_MODE, ParamValue::Int32(2)).unwrap();
    assert_eq!(registry.get_i32(KEY_MODE), Ok(2));
    assert_eq!(registry.provenance(KEY_MODE), Ok(Provenance::Overridden));

    // Setting the default value explicitly still counts as an override
    registry.set(KEY_MODE, ParamValue::Int32(0)).unwrap();
    assert_eq!(registry.provenance(KEY_MODE), Ok(Provenance::Overridden));
}

#[test]
fn unknown_key_scenario() {
    let registry = build_registry().unwrap();
    assert_eq!(registry.get("PLD_NONEXISTENT"), Err(ParameterError::UnknownKey));
    assert_eq!(
        registry.set("PLD_NONEXISTENT", ParamValue::Float(1.0)),
        Err(ParameterError::UnknownKey)
    );
    assert_eq!(registry.reset("PLD_NONEXISTENT"), Err(ParameterError::UnknownKey));
}

#[test]
fn wrong_type_rejected() {
    let registry = build_registry().unwrap();
    assert_eq!(
        registry.set(KEY_MODE, ParamValue::Float(1.0)),
        Err(ParameterError::TypeMismatch {
            expected: ParamType::Int32,
            found: ParamType::Float,
        })
    );
    assert_eq!(registry.get_i32(KEY_MODE), Ok(0));
}

#[test]
fn concurrent_readers_never_see_torn_values() {
    let registry = build_registry().unwrap();
    let accepted = [ParamValue::Float(0.5), ParamValue::Float(7.25)];
    let handle = registry.handle(KEY_ACCEPT_RADIUS).unwrap();
    registry.set(KEY_ACCEPT_RADIUS, accepted[0]).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..10_000 {
                registry.set(KEY_ACCEPT_RADIUS, accepted[i % 2]).unwrap();
                // Rejected writes must never become visible
                let _ = registry.set(KEY_ACCEPT_RADIUS, ParamValue::Float(99.0));
            }
        });

        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..10_000 {
                    let value = registry.read(handle);
                    assert!(accepted.contains(&value), "observed {}", value);
                }
            });
        }
    });
}

#[test]
fn concurrent_set_and_reset_keep_value_and_provenance_paired() {
    let registry = build_registry().unwrap();
    let default = registry.descriptor(KEY_ACCEPT_RADIUS).unwrap().default;
    let overridden = ParamValue::Float(3.5);
    let start = std::sync::Barrier::new(2);

    for round in 0..2_000 {
        registry.set(KEY_ACCEPT_RADIUS, ParamValue::Float(1.0)).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                start.wait();
                registry.reset(KEY_ACCEPT_RADIUS).unwrap();
            });
            s.spawn(|| {
                start.wait();
                registry.set(KEY_ACCEPT_RADIUS, overridden).unwrap();
            });
        });

        let entry = registry
            .enumerate(None)
            .find(|e| e.descriptor.key == KEY_ACCEPT_RADIUS)
            .unwrap();
        match entry.provenance {
            Provenance::Default => assert_eq!(entry.value, default, "round {}", round),
            Provenance::Overridden => assert_eq!(entry.value, overridden, "round {}", round),
        }
        assert_eq!(
            registry.overrides().any(|e| e.descriptor.key == KEY_ACCEPT_RADIUS),
            entry.provenance == Provenance::Overridden
        );

        registry.reset(KEY_ACCEPT_RADIUS).unwrap();
        assert_eq!(registry.get(KEY_ACCEPT_RADIUS), Ok(default));
    }
}
