// Compiles user_service.proto for the GetUserByIDs server.
// The client is generated too so integration tests can call the server.
fn main() {
    println!("cargo:rerun-if-changed=../proto/services/user_service.proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/user_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile user_service.proto for user-service");
}
