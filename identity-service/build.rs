fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate gRPC server and client code from proto files
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["../proto/identity.proto"], &["../proto"])?;

    Ok(())
}
