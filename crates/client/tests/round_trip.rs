use std::net::SocketAddr;

use fixpoint_client::{Applied, ClientConfig, FETCH_FAILED, FormInput, Handler};
use fixpoint_server::{ServerConfig, SolverSettings, routes};

fn spawn_server() -> SocketAddr {
    let settings = SolverSettings::from(&ServerConfig::default());
    let (addr, server) = warp::serve(routes(settings)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn handler_for(addr: SocketAddr) -> Handler<fixpoint_client::HttpTransport, ()> {
    let config =
        ClientConfig::default().with_endpoint(format!("http://{addr}/fixed-point-iteration"));
    Handler::http(config).expect("valid config").with_log(())
}

#[tokio::test]
async fn solves_and_charts_against_live_server() {
    let mut handler = handler_for(spawn_server());
    let form = FormInput::new("(x^2 - 2)/4", "1.5", "0.0001", "50");

    assert_eq!(handler.submit(&form).await, Applied::Rendered);

    let lines = handler.result().lines();
    assert_eq!(lines[0], "Convergence achieved!");
    assert!(lines[1].starts_with("x = 1.414"), "got {}", lines[1]);

    let chart = handler.chart().chart().expect("chart is drawn");
    assert_eq!(chart.labels[0], "Iteration 0");
    assert_eq!(chart.values[0], 1.5);
    assert_eq!(lines[3], format!("Iterations: {}", chart.values.len() - 1));
}

#[tokio::test]
async fn renders_server_side_failures() {
    let mut handler = handler_for(spawn_server());

    // f(x) = -1 relaxes to g(x) = x + 1, which never settles.
    let form = FormInput::new("-1", "0", "0.0001", "5");
    handler.submit(&form).await;
    assert_eq!(
        handler.result().lines(),
        [
            "Error: Maximum iterations reached without convergence",
            "Iterations: 5",
        ]
    );
    assert!(!handler.chart().is_present());

    let form = FormInput::new("x + y", "1", "0.0001", "5");
    handler.submit(&form).await;
    let lines = handler.result().lines();
    assert!(lines[0].starts_with("Error: invalid function"), "got {}", lines[0]);
    assert_eq!(lines[1], "Iterations: 0");
}

#[tokio::test]
async fn unreachable_server_shows_fallback() {
    // Bind and drop a listener to find a port nothing is serving on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("free port");
    let mut handler = handler_for(addr);

    let form = FormInput::new("cos(x) - x", "1.5", "0.0001", "50");
    handler.submit(&form).await;

    assert_eq!(handler.result().lines(), [FETCH_FAILED]);
    assert!(!handler.chart().is_present());
}
