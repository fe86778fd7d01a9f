// [libs/domain/models-rs/src/tests_serialization.rs]
/**
 * =================================================================
 * APARATO: DUPLEX WIRE PARITY TEST (V6.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CERTIFICACIÓN DE PARIDAD JSON DEL PROTOCOLO DUPLEX
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. FRAME SHAPE: Toda trama debe cristalizar como {"type": T, "payload": P}
 *    con tags SCREAMING_SNAKE y llaves camelCase, bit-perfecta con el
 *    cliente del tablero.
 * 2. BOUNDARY REJECTION: Los discriminadores desconocidos deben colapsar
 *    en la frontera de deserialización, nunca en el despacho.
 * =================================================================
 */
