//! Networking kinds
//!
//! Services, Ingresses and IngressClasses.

pub mod ingress;
pub mod ingressclasses;
pub mod services;
