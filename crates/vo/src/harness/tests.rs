use super::*;

#[test]
fn regression_trial_is_circle() {
    assert_eq!(check_trial(&Trial::regression()), Ok(ProjectionCase::Circle));
}

#[test]
fn default_run_is_clean() {
    let summary = run(FuzzCfg::default(), 1_700_000_000).expect("no divergence");
    assert_eq!(summary.seed, 1_700_000_000);
    assert_eq!(summary.trials, 1001);
    assert_eq!(summary.counts.iter().sum::<u64>(), summary.trials);
    // Wide coordinate ranges with radii up to ~100 produce every case.
    for case in ProjectionCase::ALL {
        assert!(summary.count(case) > 0, "no {case} samples");
    }
}

#[test]
fn runs_are_reproducible() {
    let cfg = FuzzCfg {
        iterations: 200,
        ..FuzzCfg::default()
    };
    let a = run(cfg, 7).unwrap();
    let b = run(cfg, 7).unwrap();
    assert_eq!(a, b);
}

#[test]
fn many_seeds_agree() {
    let cfg = FuzzCfg {
        iterations: 250,
        coord_bound: 10.0,
        radius_max: 3.0,
    };
    for seed in 0..20 {
        if let Err(e) = run(cfg, seed) {
            panic!("seed {seed}: {e}");
        }
    }
}

#[test]
fn replay_matches_direct_check() {
    let cfg = FuzzCfg::default();
    for index in [0, 1, 17, 999] {
        let tok = ReplayToken::new(123, index);
        let direct = check_trial(&draw_trial(&cfg, tok)).unwrap();
        assert_eq!(replay(cfg, tok).unwrap(), direct);
    }
}

#[test]
fn invalid_configs_are_rejected() {
    let bad = [
        FuzzCfg {
            iterations: 0,
            ..FuzzCfg::default()
        },
        FuzzCfg {
            coord_bound: 0.0,
            ..FuzzCfg::default()
        },
        FuzzCfg {
            coord_bound: f64::INFINITY,
            ..FuzzCfg::default()
        },
        FuzzCfg {
            coord_bound: 1e308,
            ..FuzzCfg::default()
        },
        FuzzCfg {
            coord_bound: f64::MAX,
            ..FuzzCfg::default()
        },
        FuzzCfg {
            radius_max: -1.0,
            ..FuzzCfg::default()
        },
        FuzzCfg {
            radius_max: f64::NAN,
            ..FuzzCfg::default()
        },
    ];
    for cfg in bad {
        let err = run(cfg, 0).unwrap_err();
        assert!(matches!(err, FuzzError::InvalidCfg { .. }), "{cfg:?}");
        assert!(err.divergence().is_none());
        assert!(replay(cfg, ReplayToken::new(0, 0)).is_err());
    }
}

#[test]
fn largest_finite_range_still_samples() {
    let cfg = FuzzCfg {
        iterations: 50,
        coord_bound: 1e307,
        radius_max: 1.0,
    };
    assert!(cfg.validate().is_ok());
    for index in 0..50 {
        let t = draw_trial(&cfg, ReplayToken::new(1, index));
        assert!(t.va.x.is_finite() && t.vb.y.is_finite());
    }
}

#[test]
fn divergence_report_carries_state() {
    // Forged disagreement: the capture path is the same one `check_trial` uses.
    let trial = Trial::regression();
    let (a, b) = (&trial.a, &trial.b);
    let vec_form = ProjectionTest::new(a.position, b.position, a.radius, b.radius);
    let ang_form = VelocityObstacle::new(a.position, b.position, a.radius, b.radius);
    let mut d = Divergence::capture(
        &trial,
        &vec_form,
        &ang_form,
        ProjectionCase::Circle,
        ProjectionCase::Left,
    );
    assert_eq!(d.p, Vec2::new(0.0, 5.0));
    assert_eq!(d.r, 3.0);
    assert_eq!(d.w, Vec2::new(-1.0, -4.0));
    assert_eq!(d.wp, -20.0);
    assert_eq!(d.wp_neg, 20.0);
    assert!((d.tangent_length - 4.0).abs() < 1e-12);
    assert!(d.angle_between < d.beta.unwrap());

    let text = d.to_string();
    assert!(text.contains("projection=CIRCLE angular=LEFT"));
    assert!(text.contains("regression trial"));
    assert!(text.contains("w=<-1, -4>"));

    d.token = Some(ReplayToken::new(5, 11));
    let err = FuzzError::from(d.clone());
    assert_eq!(err.divergence(), Some(&d));
    assert!(err.to_string().contains("seed=5 index=11"));
}
