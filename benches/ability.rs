use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use claustro::access::{Ability, Action, ActorProfile, Permission};

const SUBJECTS: &[&str] = &["Programa", "Usuario", "Docente", "Sede", "Evaluacion", "Departamento"];
const ACTIONS: &[Action] = &[Action::Read, Action::Create, Action::Update, Action::Delete, Action::Manage];

fn gen_rules(n: usize, seed: u64) -> Vec<Permission> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let action = ACTIONS[rng.gen_range(0..ACTIONS.len())];
            let subject = SUBJECTS[rng.gen_range(0..SUBJECTS.len())];
            Permission::new(i as i64, format!("permiso-{}", i), action, subject)
        })
        .collect()
}

fn bench_can(c: &mut Criterion) {
    // Typical consoles derive tens of rules; the larger sizes bound the
    // worst case of a miss that scans the whole list.
    let ns = [16usize, 64usize, 256usize];
    let mut group = c.benchmark_group("ability_can");

    for &n in &ns {
        let ability = Ability::derive(&ActorProfile::new(1).with_permissions(gen_rules(n, 0xBEEF_CAFE)));

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("hit", n.to_string()), &n, |b, _| {
            b.iter(|| criterion::black_box(ability.can("read", "Programa")));
        });

        // Miss: no rule ever matches, full scan every query.
        group.bench_with_input(BenchmarkId::new("miss", n.to_string()), &n, |b, _| {
            b.iter(|| criterion::black_box(ability.can("read", "TablaFantasma")));
        });

        group.bench_with_input(BenchmarkId::new("tenant_scoped", n.to_string()), &n, |b, _| {
            b.iter(|| criterion::black_box(ability.can_for_tenant("read", "Programa", "dep-01")));
        });
    }
    group.finish();

    let mut build = c.benchmark_group("ability_derive");
    for &n in &ns {
        let profile = ActorProfile::new(1).with_permissions(gen_rules(n, 0xDEAD_BEEF));
        build.throughput(Throughput::Elements(n as u64));
        build.bench_with_input(BenchmarkId::new("derive", n.to_string()), &n, |b, _| {
            b.iter(|| criterion::black_box(Ability::derive(&profile)));
        });
    }
    build.finish();
}

criterion_group!(benches, bench_can);
criterion_main!(benches);
