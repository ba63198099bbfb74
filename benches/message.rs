use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ice_stun::attribute::AttrKind;
use ice_stun::{Class, MessageWriter, TransactionId, BINDING};

fn criterion_benchmark(c: &mut Criterion) {
    let token = TransactionId::from([
        0xb7, 0xe7, 0xa7, 0x01, 0xbc, 0x34, 0xd6, 0x86, 0xfa, 0x87, 0xdf, 0xae,
    ]);
    let addr: std::net::SocketAddr = "192.0.2.1:32853".parse().unwrap();
    let mut buf = BytesMut::with_capacity(1280);

    let mut stun_criterion = c.benchmark_group("stun");
    stun_criterion.throughput(Throughput::Elements(1));

    stun_criterion.bench_function("binding_request", |bencher| {
        bencher.iter(|| {
            MessageWriter::new(Class::Request, BINDING, &token, &mut buf, 1280)
                .finish()
                .unwrap();
        })
    });

    stun_criterion.bench_function("binding_response_signed", |bencher| {
        bencher.iter(|| {
            let mut writer = MessageWriter::new(Class::Response, BINDING, &token, &mut buf, 1280);
            writer
                .append_xor_addr(AttrKind::XorMappedAddress, &addr)
                .unwrap();
            writer.finish_short(None, Some("pass"), None).unwrap();
        })
    });

    stun_criterion.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
