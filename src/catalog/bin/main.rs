use lambda_http::{run, Error};
use bookstore_catalog::catalog::controller::router;
use bookstore_catalog::core::controller::AppState;
use bookstore_catalog::core::domain::Configuration;
use bookstore_catalog::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/images-test.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Configuration::from_env();
    setup_tracing(&config);

    if config.dev_mode {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }
    tracing::info!(branch = config.branch_id.as_str(), store = %config.store, "starting catalog service");

    let app = router(AppState::build(config).await);
    // Bridge lambda_http's body type to the hyper body the axum router expects.
    let app = tower::ServiceBuilder::new()
        .map_request(|req: lambda_http::Request| req.map(|body| axum::body::Body::from(body.to_vec())))
        .service(app);
    run(app).await
}
