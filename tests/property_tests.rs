#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use dqn_agent::agent::{greedy_action, q_targets, soft_update, DqnAgent, DqnConfig};
    use dqn_agent::estimator::{Estimator, Mode};
    use dqn_agent::network::QNetwork;
    use dqn_agent::replay_buffer::{Experience, ReplayBuffer};
    use ndarray::{Array1, Array2};

    // Strategy for generating finite value vectors
    fn values_strategy(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-100.0f32..100.0, len)
    }

    fn tagged(id: usize) -> Experience {
        let tag = id as f32;
        Experience::new(Array1::from_elem(2, tag), id % 4, tag, Array1::from_elem(2, tag + 1.0), id % 5 == 0)
    }

    proptest! {
        #[test]
        fn test_buffer_keeps_most_recent(capacity in 1usize..40, pushes in 0usize..150) {
            let mut buffer = ReplayBuffer::new(capacity, 0).unwrap();
            for id in 0..pushes {
                buffer.push(tagged(id));
            }
            prop_assert_eq!(buffer.len(), pushes.min(capacity));
            let ids: Vec<usize> = buffer.iter().map(|e| e.reward as usize).collect();
            let expected: Vec<usize> = (pushes.saturating_sub(capacity)..pushes).collect();
            prop_assert_eq!(ids, expected);
        }

        #[test]
        fn test_sampled_rows_are_stored_records(
            pushes in 1usize..100,
            batch in 1usize..20,
            seed in any::<u64>(),
        ) {
            prop_assume!(batch <= pushes.min(50));
            let mut buffer = ReplayBuffer::new(50, seed).unwrap();
            for id in 0..pushes {
                buffer.push(tagged(id));
            }
            let sample = buffer.sample(batch).unwrap();
            prop_assert_eq!(sample.len(), batch);
            let oldest = pushes.saturating_sub(50);
            for row in 0..batch {
                let id = sample.rewards[row] as usize;
                prop_assert!(id >= oldest && id < pushes);
                prop_assert_eq!(sample.states[[row, 1]], id as f32);
                prop_assert_eq!(sample.next_states[[row, 0]], id as f32 + 1.0);
                prop_assert_eq!(sample.actions[row], id % 4);
                prop_assert_eq!(sample.dones[row] == 1.0, id % 5 == 0);
            }
        }

        #[test]
        fn test_terminal_targets_equal_reward(
            rows in prop::collection::vec((-10.0f32..10.0, -100.0f32..100.0, any::<bool>()), 1..32),
            gamma in 0.0f32..=1.0,
        ) {
            let rewards: Array1<f32> = rows.iter().map(|r| r.0).collect();
            let q_next: Array1<f32> = rows.iter().map(|r| r.1).collect();
            let dones: Array1<f32> = rows.iter().map(|r| if r.2 { 1.0 } else { 0.0 }).collect();

            let targets = q_targets(rewards.view(), q_next.view(), dones.view(), gamma).unwrap();
            for (i, &(reward, next, done)) in rows.iter().enumerate() {
                if done {
                    prop_assert_eq!(targets[i], reward);
                } else {
                    prop_assert_eq!(targets[i], reward + gamma * next);
                }
            }
        }

        #[test]
        fn test_soft_update_never_moves_away(tau in 0.0f32..=1.0, seeds in (0u64..100, 100u64..200)) {
            let local = QNetwork::new(3, 2, seeds.0).unwrap();
            let mut target = QNetwork::new(3, 2, seeds.1).unwrap();
            let before: Vec<Vec<f32>> = target.parameters().iter().map(|p| p.iter().copied().collect()).collect();

            soft_update(&local, &mut target, tau).unwrap();

            for ((new, old), l) in target.parameters().iter().zip(&before).zip(local.parameters().iter()) {
                for ((&n, &o), &l) in new.iter().zip(old.iter()).zip(l.iter()) {
                    prop_assert!((n - l).abs() <= (o - l).abs() + 1e-6);
                }
            }
        }

        #[test]
        fn test_greedy_action_is_first_maximum(values in values_strategy(1..=12)) {
            let array = Array1::from_vec(values.clone());
            let chosen = greedy_action(array.view()).unwrap();
            let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(values[chosen], max);
            prop_assert!(values[..chosen].iter().all(|&v| v < max));
        }

        #[test]
        fn test_zero_epsilon_acts_greedily(state in values_strategy(3..=3), seed in 0u64..1000) {
            let config = DqnConfig { hidden_layers: vec![8], buffer_size: 64, batch_size: 4, seed, ..DqnConfig::new(3, 4) };
            let mut agent = DqnAgent::from_config(config).unwrap();
            let state = Array1::from_vec(state);

            let action = agent.act(state.view(), 0.0).unwrap();
            prop_assert_eq!(agent.online().mode(), Mode::Train);

            let mut online = agent.online().clone();
            let values = online.predict(state.view().insert_axis(ndarray::Axis(0))).unwrap();
            prop_assert_eq!(action, greedy_action(values.row(0)).unwrap());
        }

        #[test]
        fn test_predict_shape(batch in 1usize..16, seed in any::<u64>()) {
            let mut network = QNetwork::new(5, 3, seed).unwrap();
            let output = network.predict(Array2::zeros((batch, 5)).view()).unwrap();
            prop_assert_eq!(output.dim(), (batch, 3));
            prop_assert!(output.iter().all(|v| v.is_finite()));
        }
    }
}
