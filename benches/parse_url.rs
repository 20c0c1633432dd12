#[macro_use]
extern crate bencher;

use bencher::{black_box, Bencher};

use weburl::Url;

fn plain(bench: &mut Bencher) {
    let url = "https://example.com/";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn query_and_fragment(bench: &mut Bencher) {
    let url = "https://example.com/parkbench?tre=es&st=uff#fragment";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn port(bench: &mut Bencher) {
    let url = "https://example.com:8080";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn ipv4(bench: &mut Bencher) {
    let url = "http://192.168.0.255/sub/net";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn ipv6(bench: &mut Bencher) {
    let url = "http://[2001:db8:0:0:0:0:0:1]/";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn unicode_host(bench: &mut Bencher) {
    let url = "https://مثال.example/";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn punycode_host(bench: &mut Bencher) {
    let url = "https://xn--mgbh0fb.example/";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

fn file_path(bench: &mut Bencher) {
    let url = "file:///c:/dir/next_dir/testing/testing.json";

    bench.bytes = url.len() as u64;
    bench.iter(|| black_box(url).parse::<Url>().unwrap());
}

benchmark_group!(
    benches,
    plain,
    query_and_fragment,
    port,
    ipv4,
    ipv6,
    unicode_host,
    punycode_host,
    file_path
);
benchmark_main!(benches);
