use tonic_build::manual::Method;
use tonic_build::manual::Service;

fn unary(
    name: &str,
    route_name: &str,
    message: &str,
) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::proto::{message}Request"))
        .output_type(format!("crate::proto::{message}Response"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Messages are hand-written prost structs in src/proto, so no protoc is needed here.
    let kv_storage = Service::builder()
        .name("KvStorage")
        .package("kvwatch")
        .method(unary("get", "Get", "Get"))
        .method(unary("set", "Set", "Set"))
        .method(unary("watch", "Watch", "Watch"))
        .build();

    tonic_build::manual::Builder::new().compile(&[kv_storage]);

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
