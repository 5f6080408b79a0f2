//! R validation tests for the GLM views.
//!
//! Each test includes the R code used to generate the reference values.

use approx::assert_relative_eq;
use tidy_regress::prelude::*;

/// Dobson (1990) p. 93, randomized controlled trial, as dummy columns.
fn dobson_d93() -> Frame {
    let counts = vec![18.0, 17.0, 15.0, 20.0, 10.0, 20.0, 25.0, 13.0, 12.0];
    let outcome: Vec<usize> = (0..9).map(|i| i % 3).collect();
    let treatment: Vec<usize> = (0..9).map(|i| i / 3).collect();
    let dummy = |levels: &[usize], level: usize| -> Vec<f64> {
        levels.iter().map(|&l| f64::from(u8::from(l == level))).collect()
    };

    Frame::new()
        .with_float("counts", counts)
        .and_then(|f| f.with_float("outcome2", dummy(&outcome, 1)))
        .and_then(|f| f.with_float("outcome3", dummy(&outcome, 2)))
        .and_then(|f| f.with_float("treatment2", dummy(&treatment, 1)))
        .and_then(|f| f.with_float("treatment3", dummy(&treatment, 2)))
        .expect("valid frame")
}

fn fit_d93() -> FittedGlm {
    GlmRegressor::poisson()
        .build()
        .fit_frame(
            &dobson_d93(),
            "counts",
            &["outcome2", "outcome3", "treatment2", "treatment3"],
        )
        .expect("fit should succeed")
}

/// R Code:
/// ```r
/// counts <- c(18,17,15,20,10,20,25,13,12)
/// outcome <- gl(3,1,9)
/// treatment <- gl(3,3)
/// glm.D93 <- glm(counts ~ outcome + treatment, family = poisson())
/// summary(glm.D93)$coefficients[, 1:2]
/// #                  Estimate Std. Error
/// # (Intercept)  3.044522e+00  0.1708987
/// # outcome2    -4.542553e-01  0.2021708
/// # outcome3    -2.929871e-01  0.1927423
/// # treatment2   1.337909e-15  0.2000000
/// # treatment3   1.421085e-15  0.2000000
/// ```
#[test]
fn test_poisson_d93_coefficients_vs_r() {
    let table = tidy(&fit_d93(), &TidyOptions::default()).expect("tidy");

    let expected = [
        ("(Intercept)", 3.044522, 0.1708987),
        ("outcome2", -0.4542553, 0.2021708),
        ("outcome3", -0.2929871, 0.1927423),
        ("treatment2", 0.0, 0.2),
        ("treatment3", 0.0, 0.2),
    ];
    assert_eq!(table.len(), expected.len());
    for (term, estimate, std_error) in expected {
        let row = table.row(term).expect("term present");
        assert_relative_eq!(row.estimate, estimate, epsilon = 1e-5);
        assert_relative_eq!(row.std_error, std_error, epsilon = 1e-5);
    }
}

/// R Code:
/// ```r
/// c(deviance(glm.D93), glm.D93$null.deviance, AIC(glm.D93))
/// # [1]  5.129141 10.581446 56.760753
/// c(df.residual(glm.D93), glm.D93$df.null)
/// # [1] 4 8
/// ```
#[test]
fn test_poisson_d93_glance_vs_r() {
    let row = glance(&fit_d93()).expect("glance");

    assert_relative_eq!(row.deviance.expect("deviance"), 5.129141, epsilon = 1e-5);
    assert_relative_eq!(row.null_deviance.expect("null"), 10.581446, epsilon = 1e-5);
    assert_relative_eq!(row.aic.expect("AIC"), 56.760753, epsilon = 1e-5);
    assert_eq!(row.df_residual, Some(4));
    assert_eq!(row.df_null, Some(8));
    assert_eq!(row.nobs, Some(9));
}

/// R Code:
/// ```r
/// confint(glm.D93)
/// #                  2.5 %      97.5 %
/// # (Intercept)  2.6958215  3.36655581
/// # outcome2    -0.8577018 -0.06255840
/// # outcome3    -0.6753696  0.08244089
/// # treatment2  -0.3932548  0.39325483
/// # treatment3  -0.3932548  0.39325483
/// ```
#[test]
fn test_poisson_d93_profile_conf_int_vs_r() {
    let options = TidyOptions::builder()
        .conf_int(true)
        .build()
        .expect("options");
    let table = tidy(&fit_d93(), &options).expect("tidy");

    assert!(table.warnings.is_empty());
    let expected = [
        ("(Intercept)", 2.6958215, 3.36655581),
        ("outcome2", -0.8577018, -0.06255840),
        ("outcome3", -0.6753696, 0.08244089),
        ("treatment2", -0.3932548, 0.39325483),
        ("treatment3", -0.3932548, 0.39325483),
    ];
    for (term, low, high) in expected {
        let row = table.row(term).expect("term present");
        assert_relative_eq!(row.conf_low.expect("low"), low, epsilon = 1e-4);
        assert_relative_eq!(row.conf_high.expect("high"), high, epsilon = 1e-4);
    }
}
