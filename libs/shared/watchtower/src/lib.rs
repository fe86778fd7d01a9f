// [libs/shared/watchtower/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WATCHTOWER NEURAL OBSERVER (V6.2 - GOLD MASTER)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: GESTIÓN DE TELEMETRÍA, TRAZADO Y CAPTURA DE PÁNICOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DUAL MODE: Logs interactivos compactos en desarrollo; JSON plano
 *    aplanado para la ingesta estructurada en producción.
 * 2. PANIC SHIELD: Hook global de pánicos con volcado de coordenadas
 *    de estrato antes de la defunción del hilo.
 * 3. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 *
 * # Mathematical Proof (Observability Integrity):
 * El registro se inicializa antes de abrir cualquier socket, por lo que
 * todo fallo de ignición posterior queda trazado; el hook de pánico
 * preserva el rastro incluso ante terminaciones abruptas del host.
 * =================================================================
 */

use std::panic;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/// Inicializa el sistema de trazas Watchtower con blindaje de pánicos.
///
/// # Comportamiento:
/// - Desarrollo: logs compactos con marcas de tiempo locales.
/// - Producción: estructura JSON plana para la ingesta centralizada.
///
/// # Errors:
/// Provoca pánico si otro suscriptor global ya fue inicializado.
pub fn init_tracing(service_nominal_identifier: &str) {
    // Filtro dinámico: prioriza el dominio propio y silencia los ruidos
    // de infraestructura (Tower, Hyper, libSQL).
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={level},tower_http=warn,hyper=warn,libsql=error",
            service_nominal_identifier,
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    let is_production_strata = !cfg!(debug_assertions);

    if is_production_strata {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    }

    // Hook global: captura colapsos en hilos secundarios (workers duplex)
    // y los inyecta en el rastro antes de la terminación.
    let service_id_snapshot = service_nominal_identifier.to_string();

    panic::set_hook(Box::new(move |panic_metadata| {
        let panic_location = panic_metadata
            .location()
            .map(|location| format!("{}:{}:{}", location.file(), location.line(), location.column()))
            .unwrap_or_else(|| "UNKNOWN_STRATA_COORDINATES".to_string());

        let panic_payload_message = panic_metadata
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_metadata.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("UNDEFINED_KERNEL_COLLAPSE_PAYLOAD");

        error!(
            target: "panic_monitor",
            service = %service_id_snapshot,
            estrato = %panic_location,
            "🔥 [CRITICAL_PANIC]: Thread terminated abruptly. Analysis: {}",
            panic_payload_message
        );
    }));

    info!(
        "👁️  [WATCHTOWER_ONLINE]: Observability strata levelized for [{}]. Panic Shield ACTIVE.",
        service_nominal_identifier
    );
}
