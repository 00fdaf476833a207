//! A toy view registry: each view picks an aggregation, and every distinct tag value gets its
//! own accumulator from that aggregation.
//!
//! Run with `RUST_LOG=debug cargo run --example views` to see the bounds normalization log.

use std::collections::HashMap;

use statwise_aggregation::{
    Aggregation, AggregationData, AggregationValue, CloseValue, DistributionAggregation, bounds,
};

struct View {
    name: &'static str,
    aggregation: Aggregation,
    series: HashMap<&'static str, AggregationData>,
}

impl View {
    fn new(name: &'static str, aggregation: impl Into<Aggregation>) -> Self {
        Self {
            name,
            aggregation: aggregation.into(),
            series: HashMap::new(),
        }
    }

    fn record(&mut self, tag: &'static str, value: f64) {
        self.series
            .entry(tag)
            .or_insert_with(|| self.aggregation.new_value())
            .add_sample(value);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let latency_bounds = bounds::exponential(1.0, 2.0, 10).expect("valid layout");
    let mut views = [
        View::new("request_count", Aggregation::count()),
        View::new("latency_ms", DistributionAggregation::new(&latency_bounds)),
        // sizes supplied out of order; normalized() sorts them
        View::new(
            "response_bytes",
            DistributionAggregation::normalized([4096.0, 512.0, 1024.0, 512.0]),
        ),
    ];

    let requests = [
        ("GET /", 3.2, 800.0),
        ("GET /", 12.5, 1500.0),
        ("POST /items", 48.0, 300.0),
        ("GET /", 1.1, 5000.0),
    ];
    for (route, latency, size) in requests {
        views[0].record(route, 1.0);
        views[1].record(route, latency);
        views[2].record(route, size);
    }

    for view in views {
        for (tag, value) in view.series {
            tracing::info!(view = view.name, aggregation = %view.aggregation, tag, "{:?}", value.close());
        }
    }
}
