//! Benchmarks for the Gröbner basis engines.
//!
//! Covers both engines on small standard systems over a prime field,
//! and the sparse elimination row kernel in isolation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quartus_groebner::{buchberger, f4, GroebnerConfig};
use quartus_poly::{Monomial, MonomialOrder, SparsePoly};
use quartus_rings::zp::Zp;

const P: u64 = 32003;

fn poly(terms: &[(&[u16], i64)], n: usize) -> SparsePoly<Zp> {
    SparsePoly::new(
        terms
            .iter()
            .map(|&(e, c)| (Monomial::new(e), Zp::from_signed(c, P)))
            .collect(),
        n,
        MonomialOrder::Grevlex,
    )
}

fn cyclic4() -> Vec<SparsePoly<Zp>> {
    vec![
        poly(
            &[
                (&[1, 0, 0, 0], 1),
                (&[0, 1, 0, 0], 1),
                (&[0, 0, 1, 0], 1),
                (&[0, 0, 0, 1], 1),
            ],
            4,
        ),
        poly(
            &[
                (&[1, 1, 0, 0], 1),
                (&[0, 1, 1, 0], 1),
                (&[0, 0, 1, 1], 1),
                (&[1, 0, 0, 1], 1),
            ],
            4,
        ),
        poly(
            &[
                (&[1, 1, 1, 0], 1),
                (&[0, 1, 1, 1], 1),
                (&[1, 0, 1, 1], 1),
                (&[1, 1, 0, 1], 1),
            ],
            4,
        ),
        poly(&[(&[1, 1, 1, 1], 1), (&[0, 0, 0, 0], -1)], 4),
    ]
}

fn katsura3() -> Vec<SparsePoly<Zp>> {
    vec![
        poly(
            &[
                (&[1, 0, 0], 1),
                (&[0, 1, 0], 2),
                (&[0, 0, 1], 2),
                (&[0, 0, 0], -1),
            ],
            3,
        ),
        poly(
            &[
                (&[2, 0, 0], 1),
                (&[0, 2, 0], 2),
                (&[0, 0, 2], 2),
                (&[1, 0, 0], -1),
            ],
            3,
        ),
        poly(
            &[
                (&[1, 1, 0], 2),
                (&[0, 1, 1], 2),
                (&[0, 1, 0], -1),
            ],
            3,
        ),
    ]
}

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("groebner");
    let config = GroebnerConfig::default();

    for (name, system) in [("cyclic4", cyclic4()), ("katsura3", katsura3())] {
        group.bench_with_input(
            BenchmarkId::new("buchberger", name),
            &system,
            |b, gens| b.iter(|| black_box(buchberger(gens, MonomialOrder::Grevlex, &config))),
        );
        group.bench_with_input(BenchmarkId::new("f4", name), &system, |b, gens| {
            b.iter(|| black_box(f4(gens, MonomialOrder::Grevlex, &config)))
        });
    }

    group.finish();
}

fn bench_row_kernel(c: &mut Criterion) {
    use quartus_groebner::linalg::{eliminate, RowLayout, SparseRow};

    let mut group = c.benchmark_group("row_kernel");

    for width in [64usize, 256, 1024] {
        let fill = vec![width / 4; width];
        let layout = RowLayout::choose(&fill, width);
        let pivot_entries: Vec<(u32, Zp)> = (0..width as u32)
            .step_by(3)
            .map(|c| (c, Zp::new(c as u64 % (P - 1) + 1, P)))
            .collect();
        let row_entries: Vec<(u32, Zp)> = (0..width as u32)
            .step_by(2)
            .map(|c| (c, Zp::new(c as u64 % (P - 1) + 1, P)))
            .collect();
        let pivot = SparseRow::from_entries(&layout, &pivot_entries);
        let row = SparseRow::from_entries(&layout, &row_entries);

        group.bench_with_input(BenchmarkId::new("eliminate", width), &width, |b, _| {
            b.iter(|| {
                let mut r = row.clone();
                eliminate(&mut r, &pivot, 0, &layout);
                black_box(r)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engines, bench_row_kernel);
criterion_main!(benches);
