//! Glance summarizer integration tests.

mod common;

use approx::assert_relative_eq;
use common::*;
use faer::Mat;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;
use tidy_regress::frame::GLANCE_COLUMNS;
use tidy_regress::prelude::*;

fn ten_row_fit() -> FittedOls {
    OlsRegressor::builder()
        .build()
        .fit_frame(&ten_row_frame(), "y", &["x1", "x2"])
        .expect("fit should succeed")
}

fn ten_row_rss_tss() -> (f64, f64) {
    let x = Mat::from_fn(10, 2, |i, j| if j == 0 { TEN_X1[i] } else { TEN_X2[i] });
    let design = with_ones(&x);
    let beta = normal_equations(&design, &TEN_Y);
    let rss: f64 = (0..10)
        .map(|i| {
            let fit: f64 = (0..3).map(|j| design[(i, j)] * beta[j]).sum();
            (TEN_Y[i] - fit).powi(2)
        })
        .sum();
    let mean = TEN_Y.iter().sum::<f64>() / 10.0;
    let tss: f64 = TEN_Y.iter().map(|y| (y - mean).powi(2)).sum();
    (rss, tss)
}

#[test]
fn test_linear_glance_matches_closed_forms() {
    let row = glance(&ten_row_fit()).expect("glance");
    let (rss, tss) = ten_row_rss_tss();

    let r2 = 1.0 - rss / tss;
    assert_relative_eq!(row.r_squared.expect("r2"), r2, epsilon = 1e-10);
    assert_relative_eq!(
        row.adj_r_squared.expect("adj r2"),
        1.0 - (1.0 - r2) * 9.0 / 7.0,
        epsilon = 1e-10
    );
    assert_relative_eq!(row.sigma.expect("sigma"), (rss / 7.0).sqrt(), epsilon = 1e-10);

    let f = ((tss - rss) / 2.0) / (rss / 7.0);
    assert_relative_eq!(row.statistic.expect("F"), f, max_relative = 1e-9);
    let p = FisherSnedecor::new(2.0, 7.0).expect("valid df").sf(f);
    assert_relative_eq!(row.p_value.expect("p"), p, epsilon = 1e-12);
    assert_eq!(row.df, Some(2.0));

    let ll = -5.0 * ((2.0 * PI * rss / 10.0).ln() + 1.0);
    assert_relative_eq!(row.log_lik.expect("logLik"), ll, epsilon = 1e-9);
    assert_relative_eq!(row.aic.expect("AIC"), 8.0 - 2.0 * ll, epsilon = 1e-9);
    assert_relative_eq!(
        row.bic.expect("BIC"),
        4.0 * 10.0_f64.ln() - 2.0 * ll,
        epsilon = 1e-9
    );
    assert_relative_eq!(row.deviance.expect("deviance"), rss, epsilon = 1e-9);
    assert_eq!(row.df_residual, Some(7));
    assert_eq!(row.nobs, Some(10));
    assert!(row.null_deviance.is_none() && row.df_null.is_none());
}

#[test]
fn test_glance_is_one_row_in_canonical_order() {
    let frame = glance(&ten_row_fit())
        .expect("glance")
        .to_frame()
        .expect("frame");

    assert_eq!(frame.nrows(), 1);
    let names = frame.column_names();
    let positions: Vec<usize> = names
        .iter()
        .map(|n| GLANCE_COLUMNS.iter().position(|c| c == n).expect("canonical"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(names[0], "r.squared");
    assert_eq!(names[names.len() - 1], "nobs");
}

#[test]
fn test_poisson_glance() {
    let frame = poisson_frame();
    let model = GlmRegressor::poisson()
        .build()
        .fit_frame(&frame, "count", &["dose"])
        .expect("fit");
    let row = glance(&model).expect("glance");

    assert!(row.r_squared.is_none() && row.sigma.is_none() && row.statistic.is_none());
    assert_eq!(row.df_null, Some(19));
    assert_eq!(row.df_residual, Some(18));
    assert_eq!(row.nobs, Some(20));
    assert!(row.null_deviance.expect("null") > row.deviance.expect("deviance"));

    let y = frame.float("count").expect("count");
    let mu = &model.result().fitted_values;
    let ll: f64 = (0..20)
        .map(|i| y[i] * mu[i].ln() - mu[i] - ln_gamma(y[i] + 1.0))
        .sum();
    assert_relative_eq!(row.log_lik.expect("logLik"), ll, max_relative = 1e-10);
    assert_relative_eq!(row.aic.expect("AIC"), 4.0 - 2.0 * ll, max_relative = 1e-10);
    assert_relative_eq!(
        row.bic.expect("BIC"),
        2.0 * 20.0_f64.ln() - 2.0 * ll,
        max_relative = 1e-10
    );
}

#[test]
fn test_poisson_null_deviance_is_intercept_only_fit() {
    let frame = poisson_frame();
    let model = GlmRegressor::poisson()
        .build()
        .fit_frame(&frame, "count", &["dose"])
        .expect("fit");

    let y = frame.float("count").expect("count");
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let null = GlmFamily::Poisson.deviance(y, &vec![mean; y.len()]);
    assert_relative_eq!(
        glance(&model).expect("glance").null_deviance.expect("null"),
        null,
        max_relative = 1e-10
    );
}

#[test]
fn test_gaussian_glm_agrees_with_ols() {
    let ols = glance(&ten_row_fit()).expect("glance");
    let glm = GlmRegressor::gaussian()
        .build()
        .fit_frame(&ten_row_frame(), "y", &["x1", "x2"])
        .expect("fit");
    let row = glance(&glm).expect("glance");

    assert_relative_eq!(
        row.deviance.expect("deviance"),
        ols.deviance.expect("deviance"),
        max_relative = 1e-8
    );
    assert_relative_eq!(
        row.log_lik.expect("logLik"),
        ols.log_lik.expect("logLik"),
        max_relative = 1e-8
    );
    assert_relative_eq!(row.aic.expect("AIC"), ols.aic.expect("AIC"), max_relative = 1e-8);
    assert!(row.r_squared.is_none());
}

#[test]
fn test_arima_glance() {
    let model = FittedArima::new(
        ArimaOrder::new(2, 0, 0).term_names(true),
        vec![0.5, -0.2, 3.0],
        Mat::from_fn(3, 3, |i, j| if i == j { 0.01 } else { 0.0 }),
        0.85,
        -131.4,
        120,
    )
    .expect("valid fit");
    let row = glance(&model).expect("glance");

    let names: Vec<&str> = row.fields().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["sigma", "logLik", "AIC", "BIC", "nobs"]);
    assert_relative_eq!(row.sigma.expect("sigma"), 0.85_f64.sqrt());
    assert_relative_eq!(row.aic.expect("AIC"), 262.8 + 8.0, epsilon = 1e-10);
}

#[test]
fn test_glance_serializes_present_fields_only() {
    let linear = serde_json::to_value(glance(&ten_row_fit()).expect("glance")).expect("json");
    assert!(linear.get("r.squared").is_some());
    assert!(linear.get("adj.r.squared").is_some());
    assert!(linear.get("logLik").is_some());
    assert!(linear.get("df.residual").is_some());
    assert!(linear.get("null.deviance").is_none());

    let model = GlmRegressor::poisson()
        .build()
        .fit_frame(&poisson_frame(), "count", &["dose"])
        .expect("fit");
    let glm = serde_json::to_value(glance(&model).expect("glance")).expect("json");
    assert!(glm.get("r.squared").is_none());
    assert!(glm.get("null.deviance").is_some());
    assert!(glm.get("df.null").is_some());
}
