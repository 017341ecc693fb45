use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use trellis::{ApiRouter, GroupConfig, NoHost, RouteConfig};
use trellis_openapi::{Format, SpecConfig};

fn build_tree(groups: usize, routes_per_group: usize) -> ApiRouter<NoHost> {
    let api = ApiRouter::from_config(NoHost, SpecConfig::new());
    for g in 0..groups {
        let group = api
            .group(&format!("/group{}", g))
            .with(GroupConfig::new().with_tag(format!("group{}", g)));
        for r in 0..routes_per_group {
            group
                .add_route(Method::GET, &format!("/resource{}/:id", r))
                .with(
                    RouteConfig::new()
                        .with_operation_id(format!("get_{}_{}", g, r))
                        .with_security("auth")
                        .with_response::<String>(200),
                );
        }
    }
    api
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for (groups, routes) in [(1, 10), (10, 10), (50, 20)] {
        let id = BenchmarkId::from_parameter(groups * routes);
        group.bench_with_input(id, &(groups, routes), |b, &(groups, routes)| {
            b.iter_batched(
                || build_tree(groups, routes),
                |api| black_box(api.generate_schema(Format::Json)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_path", |b| {
        b.iter(|| trellis::normalize_path(black_box("/v1/users/:userId/posts/:postId/comments")))
    });
}

criterion_group!(benches, bench_compile, bench_normalize);
criterion_main!(benches);
