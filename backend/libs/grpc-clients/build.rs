fn main() {
    // Client stubs only; user-service generates its own server side
    let proto = "../../proto/services/user_service.proto";

    tonic_build::configure()
        .build_server(false) // This is a client library, not a server
        .build_client(true)
        .compile_protos(&[proto], &["../../proto/services/"])
        .unwrap_or_else(|e| panic!("Failed to compile {}: {}", proto, e));

    println!("cargo:rerun-if-changed=../../proto/services/");
}
