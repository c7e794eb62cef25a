//! # Boltwire Codec Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | bw-01 Packstream | value encode / decode, skip |
//! | bw-02 Bolt messages | HELLO, RUN with typed parameters |
//! | bw-03 Raft safety | violation scan over long committed logs |

use bw_01_packstream::{OrderedMap, PackstreamBuf, StructHeader, Value};
use bw_02_bolt_messages::{tag, BoltMessageDecoder, ConnectionContext, ProtocolVersion};
use bw_03_raft_safety::{safety, ClusterState, MemberId, Outcome, RaftLogCommand, RaftLogEntry, Role};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

// ============================================================================
// BW-01: Packstream
// ============================================================================

fn sample_value(width: usize) -> Value {
    let mut rng = rand::thread_rng();
    let mut map = OrderedMap::new();
    for i in 0..width {
        map.insert(
            format!("key{i}"),
            Value::from(vec![
                Value::from(rng.gen::<i64>()),
                Value::from(format!("value-{i}")),
                Value::from(rng.gen::<f64>()),
            ]),
        );
    }
    Value::Map(map)
}

fn bench_packstream(c: &mut Criterion) {
    let mut group = c.benchmark_group("bw-01-packstream");

    for width in [10, 100, 1000] {
        let value = sample_value(width);
        let mut encoded = PackstreamBuf::new();
        encoded.write_value(&value).unwrap();
        let bytes = encoded.freeze();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", width), &value, |b, value| {
            b.iter(|| {
                let mut buf = PackstreamBuf::new();
                buf.write_value(black_box(value)).unwrap();
                buf
            })
        });
        group.bench_with_input(BenchmarkId::new("decode", width), &bytes, |b, bytes| {
            b.iter(|| PackstreamBuf::wrap(black_box(bytes)).read_value().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("skip", width), &bytes, |b, bytes| {
            b.iter(|| PackstreamBuf::wrap(black_box(bytes)).skip().unwrap())
        });
    }
    group.finish();
}

// ============================================================================
// BW-02: Bolt messages
// ============================================================================

fn hello_request() -> Vec<u8> {
    let mut buf = PackstreamBuf::new();
    buf.write_struct_header(StructHeader::new(1, tag::HELLO)).unwrap();
    buf.write_map_header(3).unwrap();
    buf.write_string("user_agent").unwrap();
    buf.write_string("bench/1.0").unwrap();
    buf.write_string("bolt_agent").unwrap();
    buf.write_map_header(1).unwrap();
    buf.write_string("product").unwrap();
    buf.write_string("bench/1.0").unwrap();
    buf.write_string("routing").unwrap();
    buf.write_map_header(1).unwrap();
    buf.write_string("address").unwrap();
    buf.write_string("localhost:7687").unwrap();
    buf.freeze().to_vec()
}

fn run_request(params: usize) -> Vec<u8> {
    let mut buf = PackstreamBuf::new();
    buf.write_struct_header(StructHeader::new(3, tag::RUN)).unwrap();
    buf.write_string("UNWIND $rows AS row RETURN row").unwrap();
    buf.write_map_header(params).unwrap();
    for i in 0..params {
        buf.write_string(&format!("d{i}")).unwrap();
        buf.write_struct_header(StructHeader::new(1, b'D')).unwrap();
        buf.write_int(19_000 + i as i64);
    }
    buf.write_map_header(1).unwrap();
    buf.write_string("db").unwrap();
    buf.write_string("neo4j").unwrap();
    buf.freeze().to_vec()
}

fn bench_bolt_messages(c: &mut Criterion) {
    let mut group = c.benchmark_group("bw-02-bolt-messages");
    let decoder = BoltMessageDecoder::new();
    let ctx = ConnectionContext::new(ProtocolVersion::V5_4);

    let hello = hello_request();
    group.bench_function("hello_v53", |b| {
        b.iter(|| decoder.decode_bytes(&ctx, black_box(&hello)).unwrap())
    });

    for params in [1, 50, 500] {
        let run = run_request(params);
        group.throughput(Throughput::Elements(params as u64));
        group.bench_with_input(BenchmarkId::new("run_with_dates", params), &run, |b, run| {
            b.iter(|| decoder.decode_bytes(&ctx, black_box(run)).unwrap())
        });
    }
    group.finish();
}

// ============================================================================
// BW-03: Raft safety
// ============================================================================

fn replicated_cluster(members: usize, entries: usize) -> ClusterState {
    let ids: Vec<MemberId> = (0..members).map(|_| MemberId::random()).collect();
    let mut cluster = ClusterState::new(ids.iter().copied());
    let batch: Vec<RaftLogEntry> = (0..entries)
        .map(|i| RaftLogEntry::new(1, format!("entry-{i}")))
        .collect();

    for id in ids {
        let outcome = Outcome::new(Role::Follower, cluster.state(id).unwrap())
            .with_term(1)
            .with_commit_index(entries as i64 - 1)
            .with_log_command(RaftLogCommand::BatchAppend {
                base_index: 0,
                entries: batch.clone(),
            });
        cluster.apply(id, &outcome).unwrap();
    }
    cluster
}

fn bench_raft_safety(c: &mut Criterion) {
    let mut group = c.benchmark_group("bw-03-raft-safety");

    for entries in [100, 1000, 10_000] {
        let cluster = replicated_cluster(5, entries);
        group.throughput(Throughput::Elements(entries as u64));
        group.bench_with_input(
            BenchmarkId::new("committed_log_scan", entries),
            &cluster,
            |b, cluster| b.iter(|| safety::inconsistent_committed_log_entries(black_box(cluster)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_packstream, bench_bolt_messages, bench_raft_safety);
criterion_main!(benches);
