//! End-to-end requests through a configured gateway.

use gatehouse::prelude::*;
use gatehouse_test::{capture_logs, RecordingMiddleware, TestRequest, VisitLog};
use http::StatusCode;

/// `auth` reads the caller from headers: `x-user` signs in, `x-role` adds
/// a role.
struct HeaderAuth;

impl Middleware for HeaderAuth {
    fn name(&self) -> &str {
        "auth"
    }

    fn process(&self, ctx: &mut MiddlewareContext, req: Request, next: Next<'_>) -> Response {
        if let Some(user) = header(&req, "x-user") {
            let mut identity = CallerIdentity::user(user, format!("{user}@example.com"));
            if let Some(role) = header(&req, "x-role") {
                identity = identity.with_role(role);
            }
            ctx.set_identity(identity);
        }
        next.run(ctx, req)
    }
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn gateway(config: GatehouseConfig, log: &VisitLog) -> Gateway {
    Gateway::builder(config)
        .middleware(RecordingMiddleware::new("logging", log))
        .middleware(RecordingMiddleware::new("security", log))
        .middleware(RecordingMiddleware::new("session", log))
        .middleware(RecordingMiddleware::new("csrf", log))
        .middleware(HeaderAuth)
        .build()
        .unwrap()
}

fn handled(ctx: &mut MiddlewareContext, _req: Request) -> Response {
    let body = format!("hello {}", ctx.identity().log_id());
    Response::error(StatusCode::OK, &body)
}

fn send(gateway: &Gateway, chain_type: ChainType, request: TestRequest) -> gatehouse_test::TestResponse {
    let (mut ctx, request) = request.into_parts();
    let response = gateway.handle(chain_type, &mut ctx, request, handled).unwrap();
    gatehouse_test::TestResponse::from_response(response)
}

#[test]
fn admin_users_page() {
    let log = VisitLog::new();
    let gateway = gateway(GatehouseConfig::default(), &log);

    send(&gateway, ChainType::Web, TestRequest::get("/admin/users").build().unwrap())
        .assert_redirect("/login");

    send(
        &gateway,
        ChainType::Web,
        TestRequest::get("/admin/users").header("x-user", "u1").build().unwrap(),
    )
    .assert_forbidden("Admin access required");

    send(
        &gateway,
        ChainType::Web,
        TestRequest::get("/admin/users")
            .header("x-user", "a1")
            .header("x-role", "admin")
            .build()
            .unwrap(),
    )
    .assert_status(StatusCode::OK);
}

#[test]
fn configured_login_path_and_admin_role() {
    let log = VisitLog::new();
    let config = ConfigLoader::new()
        .with_string(
            r#"
            [enforcement]
            login_path = "/auth/login"
            admin_role = "staff"
            "#,
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();
    let gateway = gateway(config, &log);

    send(&gateway, ChainType::Admin, TestRequest::get("/admin").build().unwrap())
        .assert_redirect("/auth/login");

    // The stock "admin" role means nothing here.
    send(
        &gateway,
        ChainType::Admin,
        TestRequest::get("/admin").header("x-user", "a1").header("x-role", "admin").build().unwrap(),
    )
    .assert_status(StatusCode::FORBIDDEN);

    send(
        &gateway,
        ChainType::Admin,
        TestRequest::get("/admin").header("x-user", "s1").header("x-role", "staff").build().unwrap(),
    )
    .assert_status(StatusCode::OK);
}

#[test]
fn public_pages_and_assets() {
    let log = VisitLog::new();
    let gateway = gateway(GatehouseConfig::default(), &log);

    send(&gateway, ChainType::Web, TestRequest::get("/login").build().unwrap())
        .assert_status(StatusCode::OK)
        .assert_body_eq("hello anonymous");

    log.clear();
    send(&gateway, ChainType::Static, TestRequest::get("/assets/app.css").build().unwrap())
        .assert_status(StatusCode::OK);
    assert_eq!(log.entered(), vec!["logging"]);
}

#[test]
fn late_public_rule_only_covers_unclaimed_paths() {
    let gateway = Gateway::builder(GatehouseConfig::default())
        .middleware(HeaderAuth)
        .rule(AccessRule::new("/forms/:id/embed", AccessLevel::Public))
        .rule(AccessRule::new("/admin/embed", AccessLevel::Public))
        .build()
        .unwrap();

    send(&gateway, ChainType::Web, TestRequest::get("/forms/42/embed").build().unwrap())
        .assert_status(StatusCode::OK);
    // Admin prefixes beat any rule.
    send(&gateway, ChainType::Web, TestRequest::get("/admin/embed").build().unwrap())
        .assert_redirect("/login");
}

#[test]
fn access_decision_is_logged_and_recorded() {
    let log = VisitLog::new();
    let gateway = gateway(GatehouseConfig::default(), &log);

    let (ctx, logs) = capture_logs(|| {
        let (mut ctx, request) = TestRequest::post("/settings")
            .header("x-user", "u1")
            .build()
            .unwrap()
            .into_parts();
        gateway.handle(ChainType::Api, &mut ctx, request, handled).unwrap();
        ctx
    });

    let outcome = ctx.get_extension::<AccessOutcome>().unwrap();
    assert_eq!(outcome.level, AccessLevel::Authenticated);
    assert!(matches!(outcome.source, DecisionSource::Rule { index: 3, .. }));
    assert!(outcome.allowed());

    assert!(logs.contains("DEBUG", "access decision"));
    assert_eq!(logs.field_values("DEBUG", "source"), vec!["rule[3]:/settings"]);
}

#[test]
fn missing_integrator_stages_are_reported_at_build() {
    let ((), logs) = capture_logs(|| {
        Gateway::builder(GatehouseConfig::default()).build().unwrap();
    });

    // Every table except `static` and `public` is missing at least `auth`.
    assert!(logs.contains("WARN", "middleware not registered"));
    assert!(logs.contains("INFO", "gateway ready"));
}
