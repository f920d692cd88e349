use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use rbc_quickstart::bases::{chebyshev, fourier};
use rbc_quickstart::config::Physics;
use rbc_quickstart::problem::Params;
use rbc_quickstart::{Boussinesq2D, Domain, Integrate, Timestepper};

const SIZES: [(usize, usize); 3] = [(64, 17), (128, 33), (256, 65)];

pub fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Boussinesq2D");
    group.significance_level(0.1).sample_size(10);
    let physics = Physics {
        prandtl: 1.,
        rayleigh: 1e5,
        forcing: 1.,
    };
    let params = Params {
        diffusivity: physics.diffusivity(),
        viscosity: physics.viscosity(),
        forcing: physics.forcing,
    };
    let dt = 0.01;
    for (nx, nz) in SIZES.iter() {
        for scheme in [Timestepper::RK222, Timestepper::RK443] {
            let domain = Domain::new(fourier(*nx, 4.), chebyshev(*nz, (-0.5, 0.5)));
            let mut solver = Boussinesq2D::new(domain, params)
                .build_solver(scheme)
                .unwrap();
            solver.random_perturbation(42, 1e-3).unwrap();
            let name = format!("Size: {} x {}, {:?}", nx, nz, scheme);
            group.bench_function(&name, |b| b.iter(|| solver.update(dt).unwrap()));
        }
    }
    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
