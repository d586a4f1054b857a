use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ql_instruments::{OptionType, VanillaOption};
use ql_models::{BatesModel, HestonFamilyModel, HestonModel};
use ql_pricingengines::AnalyticHestonEngine;
use ql_processes::HestonProcess;
use ql_quotes::SimpleQuote;
use ql_termstructures::{FlatForward, TermStructureData};
use ql_time::{Actual365Fixed, Date, NullCalendar};

fn process(today: Date) -> HestonProcess {
    let data = || TermStructureData::fixed(today, NullCalendar, Actual365Fixed);
    HestonProcess::new(
        Arc::new(SimpleQuote::new(100.0)),
        Arc::new(FlatForward::new(data(), 0.02)),
        Arc::new(FlatForward::new(data(), 0.0)),
        0.04,
        1.8,
        0.04,
        0.5,
        -0.7,
    )
    .expect("valid Heston parameters")
}

fn bench_integration_order(c: &mut Criterion) {
    let today = Date::from_ymd(2025, 1, 15).expect("valid date");
    let expiry = today + 365;
    let strikes: Vec<f64> = (0..50).map(|i| 60.0 + i as f64 * 1.6).collect();
    let options: Vec<VanillaOption> = strikes
        .iter()
        .map(|&k| VanillaOption::european(OptionType::Put, k, expiry).expect("valid option"))
        .collect();

    let models: Vec<(&str, Arc<dyn HestonFamilyModel>)> = vec![
        ("heston", Arc::new(HestonModel::new(process(today)).expect("valid model"))),
        (
            "bates",
            Arc::new(BatesModel::new(process(today), 1.1, -0.13, 0.17).expect("valid model")),
        ),
    ];

    let mut group = c.benchmark_group("transform_engine_50_strikes");
    for (name, model) in models {
        for order in [32, 64, 160] {
            let engine = AnalyticHestonEngine::new(model.clone())
                .and_then(|e| e.with_integration_order(order))
                .expect("valid quadrature order");
            group.bench_with_input(BenchmarkId::new(name, order), &engine, |b, engine| {
                b.iter(|| {
                    let mut sum = 0.0;
                    for option in &options {
                        sum += option.npv(black_box(engine)).expect("price");
                    }
                    black_box(sum)
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_integration_order);
criterion_main!(benches);
