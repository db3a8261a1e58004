//! Server-preferred pension estimation with local fallback.

mod common;

use common::{career_json, case_json, TestDesk};
use pension_desk::pension::{estimate_locally, EstimateSource};
use pension_desk::views::{CaseDetail, DetailOutcome};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_case(desk: &TestDesk) {
    Mock::given(method("GET"))
        .and(path("/api/dossiers/8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(case_json(8, "1610575123456", "Dupont", "Jean", "EN_COURS")),
        )
        .mount(&desk.server)
        .await;
}

async fn mount_case_with_careers(desk: &TestDesk) {
    mount_case(desk).await;
    Mock::given(method("GET"))
        .and(path("/api/carrieres/dossier/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            career_json(1, 8, 30000.0, 100),
            career_json(2, 8, 40000.0, 72)
        ])))
        .mount(&desk.server)
        .await;
}

async fn loaded_detail(desk: &TestDesk) -> CaseDetail {
    let mut detail = CaseDetail::new(
        desk.ctx.services.cases.clone(),
        desk.ctx.services.careers.clone(),
    );
    assert!(matches!(detail.load(8).await, DetailOutcome::Show(_)));
    detail
}

#[tokio::test]
async fn test_server_calculation_is_preferred() {
    let desk = TestDesk::start().await;
    mount_case(&desk).await;

    // the server figure needs no careers
    Mock::given(method("GET"))
        .and(path("/api/carrieres/dossier/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&desk.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/dossiers/8/calculate-pension"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "montant": 1742.0,
            "details": {
                "salaireMoyenAnnuel": 35000.0,
                "trimestresValides": 172,
                "tauxPension": 50.0
            }
        })))
        .expect(1)
        .mount(&desk.server)
        .await;

    let detail = loaded_detail(&desk).await;
    let estimate = detail.estimate(&desk.ctx.estimator()).await.expect("estimate");

    assert_eq!(estimate.source, EstimateSource::Server);
    assert_eq!(estimate.amount, 1742.0);
    assert_eq!(estimate.details.validated_quarters, 172);
}

#[tokio::test]
async fn test_server_failure_falls_back_to_local_rule() {
    let desk = TestDesk::start().await;
    mount_case_with_careers(&desk).await;

    Mock::given(method("POST"))
        .and(path("/api/dossiers/8/calculate-pension"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Erreur lors du calcul"
        })))
        .mount(&desk.server)
        .await;

    let detail = loaded_detail(&desk).await;
    let estimate = detail.estimate(&desk.ctx.estimator()).await.expect("estimate");

    // 172 quarters, average salary 35000, full rate
    assert!(estimate.is_fallback());
    assert_eq!(estimate.details.validated_quarters, 172);
    assert_eq!(estimate.details.average_salary, 35000.0);
    assert_eq!(estimate.details.rate, 50.0);
    assert_eq!(estimate.amount, 17500.0);
}

#[tokio::test]
async fn test_local_estimate_skips_server() {
    let desk = TestDesk::start().await;
    mount_case_with_careers(&desk).await;

    Mock::given(method("POST"))
        .and(path("/api/dossiers/8/calculate-pension"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"montant": 1.0})))
        .expect(0)
        .mount(&desk.server)
        .await;

    let detail = loaded_detail(&desk).await;
    let estimate = detail.estimate_local().await.expect("estimate");

    assert_eq!(estimate.source, EstimateSource::LocalFallback);
    let careers = desk.ctx.services.careers.by_case(8).await.expect("careers");
    assert_eq!(estimate, estimate_locally(&careers));
}

#[tokio::test]
async fn test_fallback_without_careers_is_zero() {
    let desk = TestDesk::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dossiers/9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(case_json(9, "2750931987654", "Martin", "Claire", "BROUILLON")),
        )
        .mount(&desk.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/carrieres/dossier/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&desk.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/dossiers/9/calculate-pension"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&desk.server)
        .await;

    let mut detail = CaseDetail::new(
        desk.ctx.services.cases.clone(),
        desk.ctx.services.careers.clone(),
    );
    detail.load(9).await;
    let estimate = detail.estimate(&desk.ctx.estimator()).await.expect("estimate");

    assert!(estimate.is_fallback());
    assert_eq!(estimate.amount, 0.0);
    assert_eq!(estimate.details.validated_quarters, 0);
}
