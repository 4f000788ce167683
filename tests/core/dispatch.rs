use std::cell::Cell;

use approx::assert_abs_diff_eq;
use numint::{
    core::integrate::{
        integrate, integrate_intervals, integrate_named, Method, QuadratureConfig,
        DEFAULT_SUBDIVISIONS,
    },
    errors::IntegError,
};

use crate::{setup, test_helpers::counted};

#[test]
fn every_method_integrates_cubic_primitive() {
    setup();
    for method in Method::ALL {
        let res = integrate(|x| 3f64 * x * x, 0f64, 1f64, method, 1000).unwrap();
        assert_abs_diff_eq!(res, 1f64, epsilon = 1e-5);
    }
}

#[test]
fn named_methods_match_enum() {
    setup();
    let f = |x: f64| x.cos() * x;
    for method in Method::ALL {
        assert_eq!(
            integrate_named(f, 0f64, 2f64, method.name(), 50),
            integrate(f, 0f64, 2f64, method, 50)
        );
    }
}

#[test]
fn unknown_method_rejected_before_evaluation() {
    setup();
    let calls = Cell::new(0);
    let f = counted(|x| x, &calls);
    let err = integrate_named(&f, 0f64, 1f64, "bogus", DEFAULT_SUBDIVISIONS).unwrap_err();
    assert_eq!(
        err,
        IntegError::UnknownMethod {
            method: "bogus".to_string()
        }
    );
    assert_eq!(calls.get(), 0);

    let msg = err.to_string();
    assert!(msg.contains("bogus"));
    for method in Method::ALL {
        assert!(msg.contains(method.name()), "{}", msg);
    }
}

#[test]
fn unknown_method_checked_before_subdivisions() {
    setup();
    assert!(matches!(
        integrate_named(|x| x, 0f64, 1f64, "Simpsons", 3),
        Err(IntegError::UnknownMethod { .. })
    ));
    assert!(matches!(
        integrate_named(|x| x, 0f64, 1f64, "", 0),
        Err(IntegError::UnknownMethod { .. })
    ));
}

#[test]
fn dispatcher_forwards_rule_errors() {
    setup();
    assert_eq!(
        integrate(|x| x, 0f64, 1f64, Method::Simpsons, 1),
        Err(IntegError::OddSubdivisions { n: 1 })
    );
    assert_eq!(
        integrate_named(|x| x, 0f64, 1f64, "midpoint", 0),
        Err(IntegError::NonPositiveSubdivisions { n: 0 })
    );
}

#[test]
fn defaults() {
    let cfg = QuadratureConfig::default();
    assert_eq!(cfg.method, Method::Trapezoidal);
    assert_eq!(cfg.n, 1000);
    assert_eq!(Method::default(), Method::Trapezoidal);

    let res = cfg.integrate(|x| 2f64 * x, 0f64, 1f64).unwrap();
    assert_abs_diff_eq!(res, 1f64, epsilon = 1e-9);
}

#[test]
fn config_uses_its_method() {
    setup();
    let cfg = QuadratureConfig {
        method: Method::Simpsons,
        n: 7,
    };
    assert_eq!(
        cfg.integrate(|x| x, 0f64, 1f64),
        Err(IntegError::OddSubdivisions { n: 7 })
    );
}

#[test]
fn method_names_round_trip() {
    for method in Method::ALL {
        assert_eq!(method.to_string().parse::<Method>(), Ok(method));
    }
    assert_eq!("simpsons".parse::<Method>(), Ok(Method::Simpsons));
    assert!("trapezoid".parse::<Method>().is_err());
}

#[test]
fn intervals_are_summed() {
    setup();
    let res = integrate_intervals(
        |x| 2f64 * x,
        &[[0f64, 1f64], [1f64, 2f64]],
        Method::Midpoint,
        10,
    )
    .unwrap();
    assert_abs_diff_eq!(res, 4f64, epsilon = 1e-12);

    let res = integrate_intervals(|x| x, &[[0f64, 2f64], [2f64, 0f64]], Method::Trapezoidal, 4)
        .unwrap();
    assert_abs_diff_eq!(res, 0f64, epsilon = 1e-12);

    assert_eq!(
        integrate_intervals(|x| x, &[], Method::Simpsons, 10),
        Ok(0f64)
    );
}

#[test]
fn intervals_propagate_errors() {
    setup();
    assert_eq!(
        integrate_intervals(|x| x, &[[0f64, 1f64]], Method::Simpsons, 5),
        Err(IntegError::OddSubdivisions { n: 5 })
    );
}
