use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ph_ring::config::{Block, Cfg, Contract, DropNewest, Fenced, Reported, SingleThread};
use ph_ring::{Inline, RingBuffer};

fn bench_throughput(c: &mut Criterion) {
    let mut ring =
        RingBuffer::<Inline<1024>, Cfg<SingleThread, Block, Contract>>::new(Inline::new(), 16);
    let element = [0x11u8; 16];
    let mut out = [0u8; 16];

    c.bench_function("single_thread_roundtrip_16b", |b| {
        b.iter(|| {
            ring.write(black_box(&element));
            ring.read(black_box(&mut out));
        })
    });

    let mut ring =
        RingBuffer::<Inline<1024>, Cfg<Fenced, DropNewest, Reported>>::new(Inline::new(), 16);
    let (mut producer, mut consumer) = ring.split();

    c.bench_function("fenced_roundtrip_16b", |b| {
        b.iter(|| {
            black_box(producer.write(black_box(&element)));
            black_box(consumer.read(black_box(&mut out)));
        })
    });

    let mut ring = RingBuffer::<Inline<1024>, Cfg<Fenced, Block, Contract>>::new(Inline::new(), 16);
    let (mut producer, mut consumer) = ring.split();

    c.bench_function("fenced_zero_copy_16b", |b| {
        b.iter(|| {
            producer.write_alloc().fill(0x22);
            producer.write_enqueue();
            black_box(consumer.read_dequeue());
            consumer.read_free();
        })
    });
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
