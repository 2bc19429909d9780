use super::*;

#[test]
fn healthy_report_shows_status() {
    let report = HealthReport::Healthy { status: "ok".into() };
    assert_eq!(report.title(), "✅ Статус системы");
    assert_eq!(report.body_html(), "Сервер работает нормально<br><strong>Статус:</strong> ok");
}

#[test]
fn server_error_falls_back_to_unknown() {
    let report = HealthReport::ServerError { detail: None };
    assert_eq!(report.title(), "❌ Ошибка");
    assert_eq!(report.body_html(), "Проблема с сервером: Неизвестная ошибка");
}

#[test]
fn report_values_are_escaped() {
    let report = HealthReport::Unreachable { reason: "<script>".into() };
    assert_eq!(report.body_html(), "Не удалось подключиться к серверу: &lt;script&gt;");
}

#[test]
fn modal_is_reused_across_reports() {
    let mut modal = DiagnosticModal::default();
    assert!(!modal.visible);

    modal.present(&HealthReport::Healthy { status: "ok".into() });
    assert!(modal.visible);
    modal.dismiss();
    assert!(!modal.visible);

    modal.present(&HealthReport::ServerError { detail: Some("db down".into()) });
    assert!(modal.visible);
    assert_eq!(modal.title, ERROR_TITLE);
    assert_eq!(modal.body_html, "Проблема с сервером: db down");
}
