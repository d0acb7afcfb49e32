// handlers/elevated/mod.rs - Elevated handlers (admin JWT required)
//
// Security Level: JWT authentication + ADMIN role
// Route Prefix: /api/root/*
// Middleware: jwt_auth_middleware → require_admin_middleware
pub mod root;
