use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storymap_layout::compose;
use storymap_schema::{Activity, Backbone, Document, Persona, Story};

const VERSIONS: [&str; 3] = ["MVP", "Release1", "Release2"];

fn large_map(columns: usize, stories_per_column: usize) -> Document {
    let mut doc = Document::default();
    doc.story_map_structure.activities.push(Activity::new("ACT", "Activity"));
    for c in 0..columns {
        doc.story_map_structure
            .backbones
            .push(Backbone::new(format!("BB-{:03}", c), "ACT", "Column", c as i64 + 1));
    }

    for p in 0..4 {
        let mut persona = Persona::new(format!("Persona {}", p));
        for c in 0..columns {
            for s in 0..stories_per_column / 4 {
                persona.stories.push(
                    Story::new(format!("ST-{}-{}-{}", p, c, s), "story", format!("BB-{:03}", c))
                        .with_version(VERSIONS[s % VERSIONS.len()])
                        .with_sort(s as i64 + 1),
                );
            }
        }
        doc.personas.insert(format!("P{:03}", p), persona);
    }
    doc
}

fn bench_compose(c: &mut Criterion) {
    let small = large_map(8, 16);
    let large = large_map(40, 100);

    c.bench_function("compose_small_map", |b| b.iter(|| compose(black_box(&small))));
    c.bench_function("compose_large_map", |b| b.iter(|| compose(black_box(&large))));
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
