/// A macro to create a [`QNetwork`](crate::network::QNetwork) from dense layer triples.
///
/// # Examples
///
/// ```
/// use dqn_agent::activations::Activation;
/// use dqn_agent::estimator::Estimator;
/// use dqn_agent::q_network;
///
/// let network = q_network!(seed = 7;
///     (4, 32, Activation::Relu),
///     (32, 2, Activation::Linear)
/// ).unwrap();
/// assert_eq!(network.output_size(), 2);
/// ```
///
/// Each triple is `(input_size, output_size, activation)`; adjacent sizes
/// must agree. Evaluates to `Result<QNetwork>`.
#[macro_export]
macro_rules! q_network {
    (seed = $seed:expr; $( ($input_size:expr, $output_size:expr, $activation:expr) ),+ $(,)?) => {
        $crate::network::QNetwork::from_dense(
            &[$( ($input_size, $output_size, $activation) ),+],
            $seed,
        )
    };
    ($( ($input_size:expr, $output_size:expr, $activation:expr) ),+ $(,)?) => {
        $crate::q_network!(seed = 0; $( ($input_size, $output_size, $activation) ),+)
    };
}
