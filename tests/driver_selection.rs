use mesh_helm::prelude::*;
use proptest::prelude::*;

fn inputs(n_zones: usize, unsteady: UnsteadyMode, fsi: bool) -> DriverInputs {
    DriverInputs {
        n_zones,
        unsteady,
        fsi,
    }
}

#[test]
fn dispatch_cases_from_the_decision_table() {
    let cases = [
        ((1, UnsteadyMode::Steady, false), DriverKind::SingleZone),
        ((3, UnsteadyMode::TimeSpectral, false), DriverKind::Spectral),
        ((2, UnsteadyMode::Steady, true), DriverKind::Fsi),
        ((2, UnsteadyMode::Steady, false), DriverKind::MultiZone),
        // Coupling flag is ignored when the zone count is not 2.
        ((4, UnsteadyMode::Steady, true), DriverKind::MultiZone),
        // Single zone outranks spectral.
        ((1, UnsteadyMode::TimeSpectral, false), DriverKind::SingleZone),
        // Spectral outranks FSI.
        ((2, UnsteadyMode::TimeSpectral, true), DriverKind::Spectral),
    ];
    for ((n_zones, unsteady, fsi), expected) in cases {
        assert_eq!(
            select_driver(&inputs(n_zones, unsteady, fsi)),
            expected,
            "({n_zones}, {unsteady:?}, {fsi})"
        );
    }
}

#[test]
fn build_driver_end_to_end() {
    let group = SoloGroup;
    let desc = ProblemDescriptor {
        unsteady: UnsteadyMode::Steady,
        n_time_instances: 1,
        fsi_simulation: true,
    };
    let mut driver = build_driver(&group, &desc, 2, 3).unwrap();
    assert_eq!(driver.kind(), DriverKind::Fsi);
    driver.run().unwrap();
    driver.finalize().unwrap();
}

#[test]
fn construction_failure_has_no_fallback() {
    // An FSI driver over three zones cannot be constructed directly; the
    // selector would never pick it, and forcing it is an error.
    let err = mesh_helm::driver::FsiDriver::new(3, 3).unwrap_err();
    assert!(matches!(err, HelmError::FsiZoneCount { n_zones: 3 }));
}

fn any_mode() -> impl Strategy<Value = UnsteadyMode> {
    prop_oneof![
        Just(UnsteadyMode::Steady),
        Just(UnsteadyMode::TimeStepping),
        Just(UnsteadyMode::DualTime),
        Just(UnsteadyMode::TimeSpectral),
    ]
}

proptest! {
    /// Dispatch is total and deterministic over the whole input space.
    #[test]
    fn dispatch_total_and_deterministic(
        n_zones in 1usize..64,
        mode in any_mode(),
        fsi in any::<bool>(),
    ) {
        let i = inputs(n_zones, mode, fsi);
        let first = select_driver(&i);
        let second = select_driver(&i);
        prop_assert_eq!(first, second);
    }

    /// The decision table honors its fixed priority order.
    #[test]
    fn dispatch_priority_order(
        n_zones in 1usize..64,
        mode in any_mode(),
        fsi in any::<bool>(),
    ) {
        let kind = select_driver(&inputs(n_zones, mode, fsi));
        let expected = if n_zones == 1 {
            DriverKind::SingleZone
        } else if mode == UnsteadyMode::TimeSpectral {
            DriverKind::Spectral
        } else if n_zones == 2 && fsi {
            DriverKind::Fsi
        } else {
            DriverKind::MultiZone
        };
        prop_assert_eq!(kind, expected);
    }
}
